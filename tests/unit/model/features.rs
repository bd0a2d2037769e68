//! Tests for per-border feature payloads and tile feature lookup

#[cfg(test)]
mod tests {
    use crate::fixtures::{embedding, flat_border, histogram};
    use tileseam::io::configuration::DEFAULT_CNN_LAYER;
    use tileseam::model::features::{
        BorderFeatureSet, CnnLayer, ColorHistogram, GaborResponse, TileFeatures,
    };
    use tileseam::model::orientation::{Border, Rotation};

    // Tests bin count detection for regular, empty and ragged histograms
    // Verified by only checking the red channel length
    #[test]
    fn test_histogram_bins() {
        assert_eq!(histogram(0.25).bins(), Some(2));
        assert_eq!(ColorHistogram::default().bins(), None);

        let ragged = ColorHistogram::new(vec![0.5, 0.5], vec![1.0], vec![0.5, 0.5]);
        assert_eq!(ragged.bins(), None);
    }

    // Tests channel order is r, g, b
    // Verified by swapping green and blue in channels
    #[test]
    fn test_histogram_channels_order() {
        let hist = ColorHistogram::new(vec![1.0], vec![2.0], vec![3.0]);
        let channels = hist.channels();
        assert_eq!(channels, [&[1.0][..], &[2.0][..], &[3.0][..]]);
    }

    // Tests the compared Gabor descriptor ignores filter parameters
    // Verified by including orientation in the descriptor
    #[test]
    fn test_gabor_descriptor() {
        let response = GaborResponse::new(45.0, 8.0, 1.5, 0.5, 12.0);
        assert_eq!(response.descriptor(), [1.5, 0.5, 12.0]);
    }

    // Tests Gabor records decode from the extractor's key names
    // Verified by removing the orientation rename
    #[test]
    fn test_gabor_wire_names() {
        let json = r#"{"orientation": 90, "wavelength": 6, "mean": 1, "std": 2, "energy": 3}"#;
        let response: GaborResponse = serde_json::from_str(json).unwrap();
        assert!((response.orientation_degrees - 90.0).abs() < f64::EPSILON);
        assert!((response.wavelength - 6.0).abs() < f64::EPSILON);
        assert_eq!(response.descriptor(), [1.0, 2.0, 3.0]);

        let aliased = r#"{"orientation_degrees": 45, "mean": 0, "std": 0, "energy": 0}"#;
        let response: GaborResponse = serde_json::from_str(aliased).unwrap();
        assert!((response.orientation_degrees - 45.0).abs() < f64::EPSILON);
    }

    // Tests CNN layer records ignore extra extractor fields
    // Verified by denying unknown fields
    #[test]
    fn test_cnn_layer_extra_fields() {
        let json = r#"{"layer_name": "conv1", "feature_vector": [1.0, 2.0], "shape": [1, 2], "min": 0.0}"#;
        let layer: CnnLayer = serde_json::from_str(json).unwrap();
        assert_eq!(layer, CnnLayer::new("conv1", vec![1.0, 2.0]));
    }

    // Tests embedding lookup by layer name, first match wins
    // Verified by returning the last matching layer
    #[test]
    fn test_embedding_lookup() {
        let border = BorderFeatureSet::new(
            None,
            Vec::new(),
            vec![
                CnnLayer::new("a", vec![1.0]),
                CnnLayer::new("b", vec![2.0]),
                CnnLayer::new("b", vec![3.0]),
            ],
        );

        assert_eq!(border.embedding("b"), Some(&[2.0][..]));
        assert_eq!(border.embedding("missing"), None);

        let fixture = BorderFeatureSet::new(None, Vec::new(), embedding(0.5));
        assert_eq!(fixture.embedding(DEFAULT_CNN_LAYER), Some(&[0.5, 0.5, 0.5][..]));
    }

    // Tests tile construction visits every rotation and border once
    // Verified by building rotations in reverse order
    #[test]
    fn test_tile_from_fn_lookup() {
        let mut calls = 0;
        let tile = TileFeatures::from_fn(7, |rotation, border| {
            calls += 1;
            let level = (rotation.index() * 4 + border.index()) as f64 / 16.0;
            flat_border(level)
        });

        assert_eq!(calls, 16);
        assert_eq!(tile.source_index(), 7);
        for rotation in Rotation::ALL {
            for border in Border::ALL {
                let level = (rotation.index() * 4 + border.index()) as f64 / 16.0;
                assert_eq!(tile.border(rotation, border), &flat_border(level));
                assert_eq!(tile.rotation(rotation).get(border), &flat_border(level));
            }
        }
    }

    // Tests layer presence detection across rotations
    // Verified by only checking the unrotated borders
    #[test]
    fn test_tile_has_layer() {
        let tile = TileFeatures::from_fn(0, |rotation, border| {
            if rotation == Rotation::Deg270 && border == Border::Left {
                BorderFeatureSet::new(None, Vec::new(), vec![CnnLayer::new("deep", vec![1.0])])
            } else {
                BorderFeatureSet::default()
            }
        });

        assert!(tile.has_layer("deep"));
        assert!(!tile.has_layer("shallow"));
        assert!(!tile.rotation(Rotation::Deg0).has_layer("deep"));
        assert!(tile.rotation(Rotation::Deg270).has_layer("deep"));
    }
}
