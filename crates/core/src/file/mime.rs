//! Supported MIME types for upload.

/// MIME types accepted for upload. Anything else is rejected per file.
pub const SUPPORTED_MIME_TYPES: [&str; 7] = [
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "video/mp4",
    "application/json",
    "text/plain",
];

/// Check whether a declared MIME type is in the supported set.
#[must_use]
pub fn is_supported_mime(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("application/pdf")]
    #[case("image/png")]
    #[case("image/jpeg")]
    #[case("image/jpg")]
    #[case("video/mp4")]
    #[case("application/json")]
    #[case("text/plain")]
    fn test_supported_set(#[case] mime: &str) {
        assert!(is_supported_mime(mime));
    }

    #[rstest]
    #[case("application/msword")]
    #[case("application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    #[case("application/x-executable")]
    #[case("text/html")]
    #[case("")]
    fn test_rejected_types(#[case] mime: &str) {
        assert!(!is_supported_mime(mime));
    }

    #[test]
    fn test_no_case_folding() {
        // Declared types are matched exactly as sent
        assert!(!is_supported_mime("Application/PDF"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Membership in the supported set is the single source of truth.
    proptest! {
        #[test]
        fn prop_supported_iff_in_set(mime in "[a-z]+/[a-z0-9.+-]+") {
            let in_set = SUPPORTED_MIME_TYPES.contains(&mime.as_str());
            prop_assert_eq!(is_supported_mime(&mime), in_set);
        }
    }
}
