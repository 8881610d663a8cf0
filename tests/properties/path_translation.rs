//! Property tests for cross-platform path translation.

use proptest::prelude::*;

use ray_quickstart::domain::services::PathTranslator;
use ray_quickstart::domain::value_objects::Platform;

fn platform() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::ALL.to_vec())
}

fn user() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

fn relative_suffix() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap();
    proptest::collection::vec(segment, 0..=4).prop_map(|segments| segments.join("/"))
}

fn under(home: String, suffix: &str) -> String {
    if suffix.is_empty() {
        home
    } else {
        format!("{}/{}", home, suffix)
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: translation never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(
        s in "(?s).{0,256}",
        user in user(),
        platform in platform(),
    ) {
        let _ = PathTranslator::normalize(&s, &user, platform);
    }

    /// PROPERTY: `~/suffix` lands under the target platform's home for the user.
    #[test]
    fn property_home_marker_expands_for_target(
        suffix in relative_suffix(),
        user in user(),
        platform in platform(),
    ) {
        let logical = if suffix.is_empty() { "~".to_string() } else { format!("~/{}", suffix) };
        let expected = under(platform.rule().home_for(&user), &suffix);
        prop_assert_eq!(PathTranslator::normalize(&logical, &user, platform), expected);
    }

    /// PROPERTY: a path under one platform's home maps to the same suffix
    /// under every other platform's home, and back again.
    #[test]
    fn property_foreign_home_round_trips(
        suffix in relative_suffix(),
        user in user(),
        from in platform(),
        to in platform(),
    ) {
        let original = under(from.rule().home_for(&user), &suffix);

        let translated = PathTranslator::normalize(&original, &user, to);
        prop_assert_eq!(&translated, &under(to.rule().home_for(&user), &suffix));

        let back = PathTranslator::normalize(&translated, &user, from);
        prop_assert_eq!(back, original);
    }

    /// PROPERTY: translating twice for the same target changes nothing more.
    #[test]
    fn property_normalize_is_idempotent(
        suffix in relative_suffix(),
        user in user(),
        from in platform(),
        to in platform(),
        home_relative in any::<bool>(),
    ) {
        let input = if home_relative {
            format!("~/{}", suffix)
        } else {
            under(from.rule().home_for(&user), &suffix)
        };

        let once = PathTranslator::normalize(&input, &user, to);
        let twice = PathTranslator::normalize(&once, &user, to);
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: paths outside every home root are left alone.
    #[test]
    fn property_paths_outside_homes_are_unchanged(
        root in prop::sample::select(vec!["/opt", "/var/tmp", "/data", "D:/scratch", "relative"]),
        suffix in relative_suffix(),
        user in user(),
        platform in platform(),
    ) {
        let path = under(root.to_string(), &suffix);
        prop_assert_eq!(PathTranslator::normalize(&path, &user, platform), path);
    }
}
