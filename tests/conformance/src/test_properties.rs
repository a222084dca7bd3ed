//! Cross-crate properties of the signing pipeline.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use escher_auth::canonical::{encode_query, normalize_path, select_headers};
    use escher_auth::{Credential, HashAlgorithm, Signer, SignerConfig, SigningRequest};
    use escher_http::RequestParts;

    use crate::{amazon_credential, amazon_request, amazon_signer};

    fn escher_signer(hash_algo: HashAlgorithm) -> Signer {
        let config = SignerConfig::default()
            .with_hash_algo(hash_algo)
            .with_current_time(Utc.with_ymd_and_hms(2011, 9, 9, 23, 36, 0).unwrap());
        Signer::new("eu/suite/ems_request", config).expect("valid scope")
    }

    fn escher_request() -> RequestParts {
        RequestParts::new(
            "POST",
            "/example/path/?foo=bar&abc=cba",
            vec![
                ("Host".to_owned(), "example.com".to_owned()),
                ("X-Escher-Date".to_owned(), "20110909T233600Z".to_owned()),
            ],
            "HELLO WORLD!".as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_should_sign_deterministically() {
        let signer = amazon_signer();
        let mut first = amazon_request("GET", "/", "");
        let mut second = amazon_request("GET", "/", "");
        let a = signer
            .sign(&mut first, &amazon_credential(), &mut Vec::new())
            .unwrap();
        let b = signer
            .sign(&mut second, &amazon_credential(), &mut Vec::new())
            .unwrap();
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_should_normalize_paths_idempotently() {
        let corpus = [
            "/",
            "/example/./path/../path/",
            "//a//b//",
            "/a/b/../../c",
            "/trailing/..",
            "/%2F/encoded",
            "/a/./b/./c/.",
        ];
        for path in corpus {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "path: {path}");
        }
    }

    #[test]
    fn test_should_encode_query_independently_of_pair_order() {
        let forward = vec![
            ("foo".to_owned(), "bar".to_owned()),
            ("abc".to_owned(), "cba".to_owned()),
            ("a b".to_owned(), "c d".to_owned()),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(encode_query(&forward), encode_query(&reversed));
        assert_eq!(encode_query(&forward), "a%20b=c%20d&abc=cba&foo=bar");
    }

    #[test]
    fn test_should_keep_headers_block_stable_when_absent_names_are_added() {
        let headers = vec![
            ("Date".to_owned(), "Mon, 09 Sep 2011 23:36:00 GMT".to_owned()),
            ("Host".to_owned(), "host.foo.com".to_owned()),
        ];
        let base = vec!["date".to_owned(), "host".to_owned()];
        let extended = vec![
            "date".to_owned(),
            "host".to_owned(),
            "x-not-present".to_owned(),
            "x-also-absent".to_owned(),
        ];
        assert_eq!(
            select_headers(&headers, &base),
            select_headers(&headers, &extended)
        );
    }

    #[test]
    fn test_should_change_derived_key_when_any_scope_component_changes() {
        let time = Utc.with_ymd_and_hms(2011, 9, 9, 23, 36, 0).unwrap();
        let scopes = [
            "eu/suite/ems_request",
            "us/suite/ems_request",
            "eu/other/ems_request",
            "eu/suite/aws4_request",
        ];
        let keys: Vec<Vec<u8>> = scopes
            .iter()
            .map(|scope| {
                let config = SignerConfig::default().with_current_time(time);
                Signer::new(*scope, config)
                    .unwrap()
                    .derive_signing_key("secret", "20110909")
            })
            .collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_should_normalize_partly_quoted_header_values_in_the_block() {
        let headers = vec![("X-Mixed".to_owned(), "\"a   b\"  c\"".to_owned())];
        let block = select_headers(&headers, &vec!["x-mixed".to_owned()]);
        assert_eq!(block, "x-mixed:\"a   b\" c\"");
    }

    #[test]
    fn test_should_round_trip_sign_and_verify_with_escher_defaults() {
        let signer = escher_signer(HashAlgorithm::Sha256);
        let credential = Credential::new("escher-key", "escher-secret");
        let mut request = escher_request();
        let result = signer
            .sign(&mut request, &credential, &mut Vec::new())
            .unwrap();
        assert_eq!(result.algorithm_id, "ESR-HMAC-SHA256");
        assert_eq!(result.signature.len(), 64);

        let verified = signer.verify(&request, &credential).unwrap();
        assert_eq!(verified.signature, result.signature);
    }

    #[test]
    fn test_should_sign_with_sha512() {
        let signer = escher_signer(HashAlgorithm::Sha512);
        let credential = Credential::new("escher-key", "escher-secret");
        let mut request = escher_request();
        let result = signer
            .sign(&mut request, &credential, &mut Vec::new())
            .unwrap();
        assert_eq!(result.algorithm_id, "ESR-HMAC-SHA512");
        assert_eq!(result.signature.len(), 128);

        let header = request
            .headers()
            .unwrap()
            .into_iter()
            .find(|(name, _)| name == "X-Escher-Auth")
            .map(|(_, value)| value)
            .unwrap();
        assert!(header.starts_with("ESR-HMAC-SHA512 Credential=escher-key/20110909/"));
    }
}
