//! Tests for colour, texture and embedding similarity of border pairs

#[cfg(test)]
mod tests {
    use crate::fixtures::{flat_border, gabor, histogram};
    use tileseam::io::configuration::DEFAULT_CNN_LAYER;
    use tileseam::model::features::{BorderFeatureSet, CnnLayer, ColorHistogram};
    use tileseam::scoring::metrics::{
        Calibration, color_distance, color_similarity, embedding_similarity, gabor_vector,
        texture_distance, texture_similarity,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // Tests colour distance averages the three channel distances
    // Verified by summing channels without averaging
    #[test]
    fn test_color_distance_channel_mean() {
        let a = ColorHistogram::new(vec![0.5, 0.5], vec![0.5, 0.5], vec![0.5, 0.5]);
        let b = ColorHistogram::new(vec![0.0, 1.0], vec![0.5, 0.5], vec![0.5, 0.5]);

        let red = 0.25 / 0.5 + 0.25 / 1.5;
        let distance = color_distance(&a, &b).unwrap();
        assert!((distance - red / 3.0).abs() < 1e-9);
    }

    // Tests colour similarity uses the calibrated maximum distance
    // Verified by hard-coding the maximum in the metric
    #[test]
    fn test_color_similarity_calibration() {
        let a = BorderFeatureSet::new(Some(histogram(0.5)), Vec::new(), Vec::new());
        let b = BorderFeatureSet::new(Some(histogram(0.0)), Vec::new(), Vec::new());
        let distance = 0.25 / 0.5 + 0.25 / 1.5;

        let default = color_similarity(&a, &b, &Calibration::default());
        assert!((default - (1.0 - distance / 2.0)).abs() < 1e-9);

        let tight = Calibration {
            color_max_distance: 0.5,
            ..Calibration::default()
        };
        assert!(color_similarity(&a, &b, &tight).abs() < f64::EPSILON);

        let unbounded = Calibration {
            color_max_distance: 0.0,
            ..Calibration::default()
        };
        assert!(close(color_similarity(&a, &b, &unbounded), 1.0));
    }

    // Tests missing, empty or mismatched histograms degrade to zero
    // Verified by comparing only the shared prefix of bins
    #[test]
    fn test_color_similarity_degenerate() {
        let calibration = Calibration::default();
        let full = BorderFeatureSet::new(Some(histogram(0.3)), Vec::new(), Vec::new());
        let missing = BorderFeatureSet::default();
        let empty = BorderFeatureSet::new(Some(ColorHistogram::default()), Vec::new(), Vec::new());
        let wider = BorderFeatureSet::new(
            Some(ColorHistogram::new(
                vec![0.3, 0.3, 0.4],
                vec![0.3, 0.3, 0.4],
                vec![0.3, 0.3, 0.4],
            )),
            Vec::new(),
            Vec::new(),
        );

        assert!(close(color_similarity(&full, &full, &calibration), 1.0));
        assert!(color_similarity(&full, &missing, &calibration).abs() < f64::EPSILON);
        assert!(color_similarity(&empty, &empty, &calibration).abs() < f64::EPSILON);
        assert!(color_similarity(&full, &wider, &calibration).abs() < f64::EPSILON);
    }

    // Tests Gabor records flatten to mean, std, energy in filter order
    // Verified by flattening energy before std
    #[test]
    fn test_gabor_vector_layout() {
        let responses = gabor(0.5);
        let flat = gabor_vector(&responses);

        assert_eq!(flat.len(), responses.len() * 3);
        assert_eq!(flat.get(..3), Some(&[50.0, 1.0, 5.0][..]));
    }

    // Tests texture distance and similarity for scaled filter banks
    // Verified by using the squared distance
    #[test]
    fn test_texture_similarity_value() {
        let a = BorderFeatureSet::new(None, gabor(0.2), Vec::new());
        let b = BorderFeatureSet::new(None, gabor(0.3), Vec::new());
        let expected = (12.0_f64 * (10.0_f64.powi(2) + 1.0_f64.powi(2))).sqrt();

        let distance = texture_distance(&a.gabor, &b.gabor).unwrap();
        assert!((distance - expected).abs() < 1e-9);

        let similarity = texture_similarity(&a, &b, &Calibration::default());
        assert!((similarity - (1.0 - expected / 200.0)).abs() < 1e-9);
        assert!(close(texture_similarity(&a, &a, &Calibration::default()), 1.0));
    }

    // Tests empty or differently sized filter banks degrade to zero
    // Verified by truncating to the shorter bank
    #[test]
    fn test_texture_similarity_degenerate() {
        let calibration = Calibration::default();
        let full = BorderFeatureSet::new(None, gabor(0.4), Vec::new());
        let mut short_bank = gabor(0.4);
        short_bank.truncate(6);
        let short = BorderFeatureSet::new(None, short_bank, Vec::new());
        let empty = BorderFeatureSet::default();

        assert_eq!(texture_distance(&full.gabor, &short.gabor), None);
        assert_eq!(texture_distance(&empty.gabor, &empty.gabor), None);
        assert!(texture_similarity(&full, &short, &calibration).abs() < f64::EPSILON);
        assert!(texture_similarity(&empty, &empty, &calibration).abs() < f64::EPSILON);
    }

    // Tests embedding similarity reads only the named layer
    // Verified by comparing the first layer regardless of name
    #[test]
    fn test_embedding_similarity_layer_selection() {
        let a = BorderFeatureSet::new(
            None,
            Vec::new(),
            vec![
                CnnLayer::new("early", vec![1.0, 0.0]),
                CnnLayer::new(DEFAULT_CNN_LAYER, vec![1.0, 1.0]),
            ],
        );
        let b = BorderFeatureSet::new(
            None,
            Vec::new(),
            vec![
                CnnLayer::new("early", vec![0.0, 1.0]),
                CnnLayer::new(DEFAULT_CNN_LAYER, vec![2.0, 2.0]),
            ],
        );

        assert!(close(embedding_similarity(&a, &b, DEFAULT_CNN_LAYER), 1.0));
        assert!(embedding_similarity(&a, &b, "early").abs() < f64::EPSILON);
        assert!(embedding_similarity(&a, &b, "late").abs() < f64::EPSILON);
        assert!(embedding_similarity(&a, &BorderFeatureSet::default(), DEFAULT_CNN_LAYER).abs() < f64::EPSILON);
    }

    // Tests calibration rejects negative and non-finite distances
    // Verified by accepting negative maxima
    #[test]
    fn test_calibration_validate() {
        assert!(Calibration::default().validate().is_ok());

        let zero = Calibration {
            color_max_distance: 0.0,
            gabor_max_distance: 0.0,
        };
        assert!(zero.validate().is_ok());

        let negative = Calibration {
            gabor_max_distance: -1.0,
            ..Calibration::default()
        };
        assert!(negative.validate().is_err());

        let infinite = Calibration {
            color_max_distance: f64::INFINITY,
            ..Calibration::default()
        };
        assert!(infinite.validate().is_err());
    }

    // Tests a fully populated border is maximally similar to itself
    // Verified by breaking any single metric
    #[test]
    fn test_self_similarity_of_full_border() {
        let border = flat_border(0.6);
        let calibration = Calibration::default();

        assert!(close(color_similarity(&border, &border, &calibration), 1.0));
        assert!(close(texture_similarity(&border, &border, &calibration), 1.0));
        assert!(close(embedding_similarity(&border, &border, DEFAULT_CNN_LAYER), 1.0));
    }
}
