//! JSON serialization for cluster test results.

use crate::result::ClusterTestResult;

/// Serialize a ClusterTestResult to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// ClusterTestResult).
pub fn to_json(result: &ClusterTestResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a ClusterTestResult to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// ClusterTestResult).
pub fn to_json_pretty(result: &ClusterTestResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Metadata;
    use crate::statistics::Cluster;
    use crate::types::Tail;
    use ndarray::Array1;

    fn make_test_result() -> ClusterTestResult {
        ClusterTestResult {
            t_obs: Array1::from_vec(vec![0.1, 2.5, 2.8, 0.3]),
            clusters: vec![Cluster { start: 1, end: 3, mass: 5.3 }],
            p_values: vec![0.0078125],
            h0: vec![5.3, 0.0, 1.2, 0.0],
            metadata: Metadata {
                n_epochs: 12,
                n_timepoints: 4,
                tail: Tail::Positive,
                threshold: 2.0,
                n_draws: 128,
                exact: false,
                seed: 1,
                step_down_applied: false,
                runtime_secs: 0.02,
            },
        }
    }

    #[test]
    fn test_to_json() {
        let result = make_test_result();
        let json = to_json(&result).unwrap();
        assert!(json.contains("\"mass\":5.3"));
        assert!(json.contains("\"n_epochs\":12"));
    }

    #[test]
    fn test_to_json_pretty() {
        let result = make_test_result();
        let json = to_json_pretty(&result).unwrap();
        assert!(json.contains('\n')); // Pretty print has newlines
        assert!(json.contains("p_values"));
    }

    #[test]
    fn round_trips_through_serde() {
        let result = make_test_result();
        let json = to_json(&result).unwrap();
        let back: ClusterTestResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.clusters, result.clusters);
        assert_eq!(back.p_values, result.p_values);
        assert_eq!(back.t_obs, result.t_obs);
    }
}
