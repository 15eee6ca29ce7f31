//! Tests for parameter resolvers and their registration.

use untag::{
    FieldRegex, Key, LiteralRegex, LocaleFieldRegex, Mapping, ParamError, ParamRequest,
    ParamResolver, ParamTable, PatternCache, Tree, params, untag,
};

fn tree(json: &str) -> Tree {
    serde_json::from_str(json).unwrap()
}

fn mapping(json: &str) -> Mapping {
    tree(json).as_mapping().cloned().unwrap()
}

fn render(tree: &Tree) -> String {
    serde_json::to_string(tree).unwrap()
}

fn request<'a>(node: &'a Mapping, param_value: &'a str, locale: Option<&'a str>) -> ParamRequest<'a> {
    ParamRequest {
        node,
        untagged_key: "v",
        param_name: "p",
        param_value,
        value: Tree::from(1),
        locale,
    }
}

// =========================================================================
// Registration
// =========================================================================

#[test]
fn duplicate_name_is_rejected() {
    let mut table = ParamTable::new();
    table.register("env", LiteralRegex::new("prod")).unwrap();
    let err = table.register("env", LiteralRegex::new("dev")).unwrap_err();
    assert!(matches!(err, ParamError::Duplicate { ref name } if name == "env"));
    assert_eq!(err.to_string(), "parameter 'env' is already registered");
    assert_eq!(table.len(), 1);
}

#[test]
fn disabled_name_also_counts_as_taken() {
    let mut table = ParamTable::new();
    table.register_disabled("env").unwrap();
    assert!(table.register("env", LiteralRegex::new("prod")).is_err());
}

#[test]
fn names_the_grammar_cannot_address_are_rejected() {
    let mut table = ParamTable::new();
    for name in ["", "a.b", "a@b"] {
        let err = table.register(name, LiteralRegex::new("x")).unwrap_err();
        assert!(matches!(err, ParamError::InvalidName { .. }), "name: {name:?}");
    }
    assert!(table.is_empty());
}

#[test]
fn lookup_distinguishes_disabled_from_missing() {
    let mut table = ParamTable::new();
    table.register("env", LiteralRegex::new("prod")).unwrap();
    table.register_disabled("channel").unwrap();

    assert!(table.resolver("env").is_some());
    assert!(table.contains("channel"));
    assert!(table.resolver("channel").is_none());
    assert!(!table.contains("region"));
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["env", "channel"]);
}

#[test]
fn params_macro_builds_table() {
    let table = params! {
        "env" => ParamResolver::literal("prod"),
        "deploy" => FieldRegex::builder().value("production").build(),
        "locales" => LocaleFieldRegex::default(),
    }
    .unwrap();
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["env", "deploy", "locales"]);

    let empty = params! {}.unwrap();
    assert!(empty.is_empty());
}

#[test]
fn params_macro_reports_registration_errors() {
    let result = params! {
        "env" => LiteralRegex::new("a"),
        "env" => LiteralRegex::new("b"),
    };
    assert!(matches!(result, Err(ParamError::Duplicate { .. })));
}

// =========================================================================
// Literal Regex
// =========================================================================

#[test]
fn literal_regex_is_anchored() {
    let resolver = ParamResolver::literal("production");
    let node = Mapping::new();
    let mut patterns = PatternCache::new();

    let rejected = resolver
        .resolve(request(&node, "prod", None), &mut patterns)
        .unwrap();
    assert_eq!(rejected, None);

    let accepted = resolver
        .resolve(request(&node, "prod.*", None), &mut patterns)
        .unwrap();
    assert_eq!(accepted, Some((Key::name("v"), Tree::from(1))));
}

#[test]
fn empty_literal_never_matches() {
    let resolver = ParamResolver::literal("");
    let node = Mapping::new();
    let mut patterns = PatternCache::new();
    let resolution = resolver
        .resolve(request(&node, ".*", None), &mut patterns)
        .unwrap();
    assert_eq!(resolution, None);
}

// =========================================================================
// Field Regex
// =========================================================================

fn deploy_table(value: &str) -> ParamTable {
    let resolver = FieldRegex::builder()
        .value(value)
        .collection(mapping(r#"{"launch": "prod.*"}"#))
        .podspec(mapping(r#"{"launch": "never", "beta": "staging"}"#))
        .build();
    params! { "deploy" => resolver }.unwrap()
}

#[test]
fn field_regex_uses_collection_default() {
    let params = deploy_table("production");
    let input = tree(r#"{"banner": "Soon", "banner@deploy.launch": "Launch!"}"#);
    assert_eq!(
        render(&untag(&input, None, Some(&params)).unwrap()),
        r#"{"banner":"Launch!"}"#
    );
}

#[test]
fn field_regex_prefers_sibling_field() {
    let params = deploy_table("production");
    let input = tree(r#"{"launch": "staging", "banner": "Soon", "banner@deploy.launch": "Launch!"}"#);
    assert_eq!(
        render(&untag(&input, None, Some(&params)).unwrap()),
        r#"{"launch":"staging","banner":"Soon"}"#
    );
}

#[test]
fn field_regex_skips_empty_sibling_field() {
    let params = deploy_table("production");
    let input = tree(r#"{"launch": "", "banner@deploy.launch": "Launch!"}"#);
    assert_eq!(
        render(&untag(&input, None, Some(&params)).unwrap()),
        r#"{"launch":"","banner":"Launch!"}"#
    );
}

#[test]
fn field_regex_falls_back_to_podspec() {
    let input = tree(r#"{"banner@deploy.beta": "Beta"}"#);

    let production = deploy_table("production");
    assert_eq!(render(&untag(&input, None, Some(&production)).unwrap()), "{}");

    let staging = deploy_table("staging");
    assert_eq!(
        render(&untag(&input, None, Some(&staging)).unwrap()),
        r#"{"banner":"Beta"}"#
    );
}

#[test]
fn field_regex_without_any_pattern_drops_entry() {
    let params = deploy_table("production");
    let input = tree(r#"{"banner@deploy.unknown": "x"}"#);
    assert_eq!(render(&untag(&input, None, Some(&params)).unwrap()), "{}");
}

#[test]
fn field_regex_reads_fields_from_the_enclosing_mapping() {
    let params = deploy_table("production");
    let input = tree(r#"{"launch": "dev", "cards": [{"launch": "prod.*", "cta@deploy.launch": "Go"}]}"#);
    assert_eq!(
        render(&untag(&input, None, Some(&params)).unwrap()),
        r#"{"launch":"dev","cards":[{"launch":"prod.*","cta":"Go"}]}"#
    );
}

// =========================================================================
// Locale Field Regex
// =========================================================================

fn locales_table() -> ParamTable {
    let podspec = tree(r#"{"localization": {"regions": "de_.*|fr_.*", "asia": "never"}}"#);
    let collection = tree(r#"{"localization": {"asia": "ja_JP|ko_KR"}}"#);
    params! { "locales" => LocaleFieldRegex::from_sections(&podspec, &collection) }.unwrap()
}

#[test]
fn locale_field_regex_matches_locale() {
    let params = locales_table();
    let input = tree(r#"{"promo@locales.regions": "EU promo", "promo@locales.asia": "Asia promo"}"#);

    let german = untag(&input, Some("de_DE"), Some(&params)).unwrap();
    assert_eq!(render(&german), r#"{"promo":"EU promo"}"#);

    let japanese = untag(&input, Some("ja_JP"), Some(&params)).unwrap();
    assert_eq!(render(&japanese), r#"{"promo":"Asia promo"}"#);

    let english = untag(&input, Some("en_US"), Some(&params)).unwrap();
    assert_eq!(render(&english), "{}");
}

#[test]
fn locale_field_regex_without_locale_drops_entry() {
    let params = locales_table();
    let input = tree(r#"{"promo@locales.regions": "EU promo"}"#);
    assert_eq!(render(&untag(&input, None, Some(&params)).unwrap()), "{}");
}

#[test]
fn locale_field_regex_tolerates_missing_sections() {
    let resolver = LocaleFieldRegex::from_sections(&Tree::Null, &tree(r#"{"title": "x"}"#));
    let node = mapping(r#"{"regions": "de_.*"}"#);
    let mut patterns = PatternCache::new();

    let resolution = ParamResolver::from(resolver)
        .resolve(request(&node, "regions", Some("de_CH")), &mut patterns)
        .unwrap();
    assert_eq!(resolution, Some((Key::name("v"), Tree::from(1))));
}

#[test]
fn locale_field_regex_builder_sets_defaults() {
    let resolver = LocaleFieldRegex::builder()
        .podspec(mapping(r#"{"regions": "it_IT"}"#))
        .build();
    let node = Mapping::new();
    let mut patterns = PatternCache::new();

    let resolution = ParamResolver::from(resolver)
        .resolve(request(&node, "regions", Some("it_IT")), &mut patterns)
        .unwrap();
    assert!(resolution.is_some());
}
