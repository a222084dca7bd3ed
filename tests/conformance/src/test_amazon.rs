//! AWS4 reference suite scenarios.

#[cfg(test)]
mod tests {
    use escher_auth::SigningRequest;
    use escher_http::SignableRequest;

    use crate::{AMAZON_DATE, AMAZON_HOST, amazon_credential, amazon_request, amazon_signer};

    const GET_VANILLA_AUTH: &str = "AWS4-HMAC-SHA256 \
        Credential=AKIDEXAMPLE/20110909/us-east-1/host/aws4_request, \
        SignedHeaders=date;host, \
        Signature=b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470";

    fn sign_uri(uri: &str) -> String {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", uri, "");
        let mut names_to_sign = vec!["date".to_owned(), "host".to_owned()];
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();
        authorization_of(&request)
    }

    fn authorization_of<R: SigningRequest>(request: &R) -> String {
        request
            .headers()
            .unwrap()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("Authorization"))
            .map(|(_, value)| value)
            .expect("signed request carries the Authorization header")
    }

    #[test]
    fn test_should_sign_get_vanilla() {
        assert_eq!(sign_uri("/"), GET_VANILLA_AUTH);
    }

    #[test]
    fn test_should_normalize_relative_paths_to_the_vanilla_signature() {
        // All of these canonicalize to "/" and must reproduce the
        // get-vanilla signature bit for bit.
        for uri in ["/foo/..", "/foo/bar/../..", "//", "/./", "/?"] {
            assert_eq!(sign_uri(uri), GET_VANILLA_AUTH, "uri: {uri}");
        }
    }

    #[test]
    fn test_should_sign_get_vanilla_query_order_key_case() {
        // Duplicate keys, mixed-case values: "foo=Zoo" sorts before "foo=aha".
        assert_eq!(
            sign_uri("/?foo=Zoo&foo=aha"),
            "AWS4-HMAC-SHA256 \
             Credential=AKIDEXAMPLE/20110909/us-east-1/host/aws4_request, \
             SignedHeaders=date;host, \
             Signature=be7148d34ebccdc6423b19085378aa0bee970bdc61d144bd1a8c48c33079ab09"
        );
    }

    #[test]
    fn test_should_sign_get_vanilla_query_order_value() {
        assert_eq!(
            sign_uri("/?foo=b&foo=a"),
            "AWS4-HMAC-SHA256 \
             Credential=AKIDEXAMPLE/20110909/us-east-1/host/aws4_request, \
             SignedHeaders=date;host, \
             Signature=feb926e49e382bec75c9d7dcb2a1b6dc8aa50ca43c25d2bc51143768c0875acc"
        );
    }

    #[test]
    fn test_should_sign_query_independently_of_incoming_pair_order() {
        assert_eq!(sign_uri("/?foo=aha&foo=Zoo"), sign_uri("/?foo=Zoo&foo=aha"));
        assert_eq!(sign_uri("/?foo=a&foo=b"), sign_uri("/?foo=b&foo=a"));
    }

    #[test]
    fn test_should_inject_date_and_host_when_names_list_is_empty() {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", "/", "");
        let mut names_to_sign = Vec::new();
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();
        // The append is in place and visible to the caller.
        assert_eq!(names_to_sign, vec!["date".to_owned(), "host".to_owned()]);
        assert_eq!(authorization_of(&request), GET_VANILLA_AUTH);
    }

    #[test]
    fn test_should_sign_identically_through_the_http_adapter() {
        let signer = amazon_signer();
        let inner = http::Request::builder()
            .method("GET")
            .uri("/")
            .header("Date", AMAZON_DATE)
            .header("Host", AMAZON_HOST)
            .body(Vec::new())
            .unwrap();
        let mut request = SignableRequest::new(inner);
        let mut names_to_sign = vec!["date".to_owned(), "host".to_owned()];
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();
        assert_eq!(authorization_of(&request), GET_VANILLA_AUTH);
    }

    #[test]
    fn test_should_report_signature_result_components() {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", "/", "");
        let mut names_to_sign = Vec::new();
        let result = signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();
        assert_eq!(result.algorithm_id, "AWS4-HMAC-SHA256");
        assert_eq!(
            result.credential_scope,
            "20110909/us-east-1/host/aws4_request"
        );
        assert_eq!(result.signed_headers, vec!["date".to_owned(), "host".to_owned()]);
        assert_eq!(
            result.signature,
            "b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470"
        );
    }

    #[test]
    fn test_should_verify_the_signed_reference_request() {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", "/", "");
        let mut names_to_sign = Vec::new();
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();

        let verified = signer.verify(&request, &amazon_credential()).unwrap();
        assert_eq!(
            verified.signature,
            "b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470"
        );
    }

    #[test]
    fn test_should_reject_a_tampered_body_on_verify() {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", "/", "");
        let mut names_to_sign = Vec::new();
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();

        let mut tampered = amazon_request("GET", "/", "EVIL");
        tampered
            .set_header("Authorization", &authorization_of(&request))
            .unwrap();

        let result = signer.verify(&tampered, &amazon_credential());
        assert!(matches!(
            result,
            Err(escher_auth::SigningError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_should_reject_a_mismatched_key_id_on_verify() {
        let signer = amazon_signer();
        let mut request = amazon_request("GET", "/", "");
        let mut names_to_sign = Vec::new();
        signer
            .sign(&mut request, &amazon_credential(), &mut names_to_sign)
            .unwrap();

        let other = escher_auth::Credential::new("OTHERKEY", crate::AMAZON_API_SECRET);
        let result = signer.verify(&request, &other);
        assert!(matches!(
            result,
            Err(escher_auth::SigningError::CredentialMismatch)
        ));
    }

    #[test]
    fn test_should_fail_verification_without_auth_header() {
        let signer = amazon_signer();
        let request = amazon_request("GET", "/", "");
        let result = signer.verify(&request, &amazon_credential());
        assert!(matches!(
            result,
            Err(escher_auth::SigningError::MissingAuthHeader)
        ));
    }
}
