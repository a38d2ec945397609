fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Normalizes JSON values so that integer-valued floats compare equal.
    fn normalize_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Number(n) => {
                if let Some(f) = n.as_f64() {
                    serde_json::json!(f)
                } else {
                    v.clone()
                }
            }
            serde_json::Value::Object(map) => {
                let normalized: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect();
                serde_json::Value::Object(normalized)
            }
            serde_json::Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(normalize_value).collect())
            }
            _ => v.clone(),
        }
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent, float-normalized comparison).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        let norm_fixture = normalize_value(&fixture);
        let norm_reserialized = normalize_value(&reserialized);
        assert_eq!(
            norm_fixture, norm_reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  client: {reserialized}"
        );
    }

    // --- Request payloads ---

    #[test]
    fn fixture_upload_target() {
        roundtrip_test::<docferry_protocol::UploadTarget>("upload_target.json");
    }

    #[test]
    fn fixture_initiate_request() {
        roundtrip_test::<docferry_protocol::InitiateUploadRequest>("initiate_request.json");
    }

    #[test]
    fn fixture_validate_request() {
        roundtrip_test::<docferry_protocol::ValidateDocumentRequest>("validate_request.json");
    }

    #[test]
    fn fixture_abort_request() {
        roundtrip_test::<docferry_protocol::messages::AbortUploadRequest>("abort_request.json");
    }

    // --- Response payloads ---

    #[test]
    fn fixture_validation_result() {
        roundtrip_test::<docferry_protocol::FileValidationResult>("validation_result.json");
    }

    #[test]
    fn fixture_chunked_upload_config() {
        roundtrip_test::<docferry_protocol::ChunkedUploadConfig>("chunked_upload_config.json");
    }

    #[test]
    fn fixture_chunk_ack() {
        roundtrip_test::<docferry_protocol::messages::ChunkAck>("chunk_ack.json");
    }

    #[test]
    fn fixture_upload_result() {
        roundtrip_test::<docferry_protocol::UploadResult>("upload_result.json");
    }

    #[test]
    fn fixture_upload_progress() {
        roundtrip_test::<docferry_protocol::UploadProgress>("upload_progress.json");
    }

    #[test]
    fn fixture_upload_statistics() {
        roundtrip_test::<docferry_protocol::UploadStatistics>("upload_statistics.json");
    }

    // --- Untagged chunk response discrimination ---

    #[test]
    fn chunk_ack_parses_as_intermediate_response() {
        let json = load_fixture("chunk_ack.json");
        let resp: docferry_protocol::ChunkResponse = serde_json::from_value(json).unwrap();
        assert!(matches!(resp, docferry_protocol::ChunkResponse::Ack(_)));
    }

    #[test]
    fn upload_result_parses_as_final_response() {
        let json = load_fixture("upload_result.json");
        let resp: docferry_protocol::ChunkResponse = serde_json::from_value(json).unwrap();
        assert!(matches!(
            resp,
            docferry_protocol::ChunkResponse::Completed(_)
        ));
    }

    // --- Backward compatibility: fields older servers omit ---

    #[test]
    fn validation_result_without_optional_lists() {
        let json = r#"{
            "isValid": true,
            "maxSize": 52428800,
            "allowedTypes": ["application/pdf", "text/csv"]
        }"#;
        let v: docferry_protocol::FileValidationResult = serde_json::from_str(json).unwrap();
        assert!(v.errors.is_empty(), "missing errors should default to empty");
        assert!(
            v.warnings.is_empty(),
            "missing warnings should default to empty"
        );
        assert_eq!(
            v.estimated_processing_time_secs, 0,
            "missing estimate should default to 0"
        );
    }

    #[test]
    fn upload_target_without_optional_fields() {
        let json = r#"{"clientId": "client-1", "documentType": "receipt"}"#;
        let target: docferry_protocol::UploadTarget = serde_json::from_str(json).unwrap();
        assert!(target.business_id.is_none());
        assert!(target.folder_id.is_none());
    }
}
