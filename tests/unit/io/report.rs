//! Tests for the JSON response document

#[cfg(test)]
mod tests {
    use crate::fixtures::request_json;
    use tileseam::algorithm::comparator::anchors;
    use tileseam::algorithm::engine::{AdjacencyEngine, AdjacencyOutcome, EngineConfig};
    use tileseam::io::report::{AdjacencyReport, ReportOptions, STATUS_SUCCESS};
    use tileseam::io::request::{AdjacencyJob, AdjacencyRequest};

    fn run_fixture() -> (AdjacencyJob, AdjacencyOutcome) {
        let job = AdjacencyRequest::from_json_str(&request_json(2).to_string())
            .unwrap()
            .into_job()
            .unwrap();
        let outcome = AdjacencyEngine::new(job.config.clone())
            .unwrap()
            .run(&job.tiles);
        (job, outcome)
    }

    fn report(options: ReportOptions) -> (AdjacencyReport, AdjacencyOutcome, EngineConfig) {
        let (job, outcome) = run_fixture();
        let report = AdjacencyReport::from_outcome(
            job.grid_size,
            job.tiles.len(),
            &job.config,
            outcome.clone(),
            options,
        );
        (report, outcome, job.config)
    }

    // Tests the default report carries the pruned ranking
    // Verified by always writing the full list
    #[test]
    fn test_report_pruned_by_default() {
        let (report, outcome, config) = report(ReportOptions::default());

        assert_eq!(report.status, STATUS_SUCCESS);
        assert_eq!(report.grid_size, 2);
        assert_eq!(report.total_tiles, 4);
        assert_eq!(report.weights, config.weights);
        assert_eq!(report.cnn_layer, config.cnn_layer);
        assert_eq!(report.top_k, 3);
        assert_eq!(report.adjacency_matrix, outcome.pruned);
        assert_eq!(report.statistics, outcome.statistics);
        assert!(report.best_matches.is_none());
    }

    // Tests the full option and best matches option
    // Verified by swapping the two options
    #[test]
    fn test_report_options() {
        let (report, outcome, _) = report(ReportOptions {
            full: true,
            best_matches: true,
        });

        assert_eq!(report.adjacency_matrix, outcome.full);
        let best = report.best_matches.unwrap();
        assert_eq!(best.len(), anchors(4).len());
    }

    // Tests the envelope uses the external camelCase keys
    // Verified by removing the rename attribute
    #[test]
    fn test_report_json_keys() {
        let (report, _, _) = report(ReportOptions::default());
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json_string().unwrap()).unwrap();

        for key in [
            "status",
            "gridSize",
            "totalTiles",
            "weights",
            "cnnLayer",
            "topK",
            "adjacencyMatrix",
            "statistics",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("bestMatches").is_none());
        assert!(value.get("minScore").is_none());

        let first = &value["adjacencyMatrix"][0];
        for key in ["tileA", "rotationA", "borderA", "tileB", "rotationB", "borderB"] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
        for key in ["combined", "color", "gabor", "cnn"] {
            assert!(first["compatibilityScore"].get(key).is_some(), "missing {key}");
        }
    }

    // Tests reports are written to disk and read back
    // Verified by writing compact JSON to the wrong path
    #[test]
    fn test_write_json() {
        let (report, _, _) = report(ReportOptions::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid_adjacency.json");

        report.write_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let decoded: AdjacencyReport = serde_json::from_str(&text).unwrap();

        assert_eq!(decoded.status, report.status);
        assert_eq!(decoded.adjacency_matrix.len(), report.adjacency_matrix.len());
        assert_eq!(decoded.statistics.total_comparisons, 4 * 3 * 64);

        let missing_dir = dir.path().join("missing").join("out.json");
        assert!(report.write_json(&missing_dir).is_err());
    }
}
