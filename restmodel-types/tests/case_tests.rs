use proptest::prelude::*;
use restmodel_types::{to_camel_case, to_kebab_case, to_snake_case};

// ── camelCase ────────────────────────────────────────────────────

#[test]
fn camel_case_from_snake() {
    assert_eq!(to_camel_case("some_name"), "someName");
    assert_eq!(to_camel_case("relation_id"), "relationId");
}

#[test]
fn camel_case_from_words() {
    assert_eq!(to_camel_case("Some name here"), "someNameHere");
}

#[test]
fn camel_case_is_idempotent_on_camel_input() {
    assert_eq!(to_camel_case("someName"), "someName");
}

#[test]
fn camel_case_lowercases_leading_character() {
    assert_eq!(to_camel_case("SomeName"), "someName");
}

#[test]
fn camel_case_drops_trailing_separator() {
    assert_eq!(to_camel_case("name_"), "name");
}

#[test]
fn camel_case_empty() {
    assert_eq!(to_camel_case(""), "");
}

// ── snake_case ───────────────────────────────────────────────────

#[test]
fn snake_case_from_camel() {
    assert_eq!(to_snake_case("someName"), "some_name");
    assert_eq!(to_snake_case("perPage"), "per_page");
}

#[test]
fn snake_case_from_kebab_and_words() {
    assert_eq!(to_snake_case("some-name"), "some_name");
    assert_eq!(to_snake_case("Some Name"), "some_name");
}

#[test]
fn snake_case_keeps_acronyms_together() {
    assert_eq!(to_snake_case("HTMLParser"), "htmlparser");
}

// ── kebab-case ───────────────────────────────────────────────────

#[test]
fn kebab_case_from_type_name() {
    assert_eq!(to_kebab_case("MyModel"), "my-model");
    assert_eq!(to_kebab_case("BlogPostComment"), "blog-post-comment");
}

#[test]
fn kebab_case_from_snake() {
    assert_eq!(to_kebab_case("some_name"), "some-name");
}

// ── Properties ───────────────────────────────────────────────────

fn camel_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}([A-Z][a-z]{1,8}){0,3}").unwrap()
}

proptest! {
    /// camel → snake → camel gives back the original identifier.
    #[test]
    fn snake_then_camel_roundtrips(ident in camel_identifier()) {
        prop_assert_eq!(to_camel_case(&to_snake_case(&ident)), ident);
    }

    /// snake_case output never contains uppercase ASCII.
    #[test]
    fn snake_case_is_lowercase(ident in camel_identifier()) {
        let snake = to_snake_case(&ident);
        prop_assert!(!snake.chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Kebab and snake differ only in the delimiter.
    #[test]
    fn kebab_mirrors_snake(ident in camel_identifier()) {
        prop_assert_eq!(to_kebab_case(&ident).replace('-', "_"), to_snake_case(&ident));
    }
}
