//! Property-based tests for logxx using proptest

use logxx::core::template;
use logxx::prelude::*;
use proptest::prelude::*;
use std::fmt::Display;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn any_filter() -> impl Strategy<Value = LevelFilter> {
    prop_oneof![
        Just(LevelFilter::All),
        Just(LevelFilter::Trace),
        Just(LevelFilter::Debug),
        Just(LevelFilter::Info),
        Just(LevelFilter::Warn),
        Just(LevelFilter::Error),
        Just(LevelFilter::Fatal),
        Just(LevelFilter::None),
    ]
}

fn any_kind() -> impl Strategy<Value = MatchKind> {
    prop_oneof![
        Just(MatchKind::Module),
        Just(MatchKind::File),
        Just(MatchKind::Function),
        Just(MatchKind::Class),
    ]
}

/// Small rule trees over a tiny name alphabet so that matches are common.
fn any_rules() -> impl Strategy<Value = RuleNode> {
    let leaf = (any_kind(), "[ab]", proptest::option::of(any_filter())).prop_map(
        |(kind, name, level)| {
            let mut node = RuleNode::new().matching(kind, name);
            node.level = level;
            node
        },
    );
    let tree = leaf.prop_recursive(3, 16, 3, |inner| {
        (
            any_kind(),
            "[ab]",
            proptest::option::of(any_filter()),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(kind, name, level, children)| {
                let mut node = RuleNode::new().matching(kind, name);
                node.level = level;
                node.children = children;
                node
            })
    });
    (
        proptest::option::of(any_filter()),
        prop::collection::vec(tree, 0..4),
    )
        .prop_map(|(level, children)| {
            let mut root = RuleNode::new();
            root.level = level;
            root.children = children;
            root
        })
}

fn any_entry() -> impl Strategy<Value = LogEntry> {
    (
        any_level(),
        proptest::option::of("[ab]"),
        proptest::option::of("[ab]"),
        proptest::option::of("[ab]"),
        proptest::option::of("[ab]"),
    )
        .prop_map(|(level, module, file, function, class)| {
            let mut entry = LogEntry::new(level, "property");
            if let Some(module) = module {
                entry = entry.with_module(module);
            }
            if let Some(file) = file {
                entry = entry.with_location(file, 1);
            }
            if let Some(function) = function {
                entry = entry.with_function(function);
            }
            if let Some(class) = class {
                entry = entry.with_class(class);
            }
            entry
        })
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level, in any letter case
    #[test]
    fn test_level_str_roundtrip(level in any_level(), upper in any::<bool>()) {
        let text = if upper {
            level.to_str().to_uppercase()
        } else {
            level.to_str().to_lowercase()
        };
        let parsed: LogLevel = text.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    #[test]
    fn test_filter_str_roundtrip(filter in any_filter()) {
        let parsed: LevelFilter = filter.to_str().parse().unwrap();
        prop_assert_eq!(filter, parsed);
    }

    /// A filter admits a level exactly when the level is at least as severe
    #[test]
    fn test_admits_follows_severity(level in any_level(), filter in any_filter()) {
        let expected = match filter {
            LevelFilter::All => true,
            LevelFilter::None => false,
            _ => level >= filter_as_level(filter),
        };
        prop_assert_eq!(filter.admits(level), expected);
    }

    /// Raising the threshold never admits more
    #[test]
    fn test_admits_is_monotonic(
        level in any_level(),
        a in any_filter(),
        b in any_filter(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if high.admits(level) {
            prop_assert!(low.admits(level));
        }
    }
}

fn filter_as_level(filter: LevelFilter) -> LogLevel {
    match filter {
        LevelFilter::Trace => LogLevel::Trace,
        LevelFilter::Debug => LogLevel::Debug,
        LevelFilter::Info => LogLevel::Info,
        LevelFilter::Warn => LogLevel::Warn,
        LevelFilter::Error => LogLevel::Error,
        LevelFilter::Fatal => LogLevel::Fatal,
        LevelFilter::All | LevelFilter::None => unreachable!(),
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// Arbitrary templates and argument counts never panic
    #[test]
    fn test_render_is_total(
        template in "[%a-z0-9 ]{0,40}",
        args in prop::collection::vec("[a-z]{0,5}", 0..5),
    ) {
        let refs: Vec<&dyn Display> = args.iter().map(|a| a as &dyn Display).collect();
        let _ = template::render(&template, &refs);
    }

    /// Templates without '%' come back unchanged
    #[test]
    fn test_render_plain_text_is_identity(
        template in "[a-zA-Z0-9 .,:]{0,60}",
        args in prop::collection::vec("[a-z]{0,5}", 0..3),
    ) {
        let refs: Vec<&dyn Display> = args.iter().map(|a| a as &dyn Display).collect();
        prop_assert_eq!(template::render(&template, &refs), template);
    }

    /// Trailing arguments no placeholder refers to are ignored
    #[test]
    fn test_render_ignores_extra_args(
        first in "[a-z]{1,8}",
        extras in prop::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let mut args: Vec<&dyn Display> = vec![&first];
        args.extend(extras.iter().map(|e| e as &dyn Display));
        prop_assert_eq!(template::render("<%1%>", &args), format!("<{}>", first));
    }
}

// ============================================================================
// Resolver Tests
// ============================================================================

proptest! {
    /// The cached decision always equals a fresh walk
    #[test]
    fn test_cache_agrees_with_walk(
        rules in any_rules(),
        default in any_filter(),
        entry in any_entry(),
        hash in any::<u64>(),
    ) {
        let resolver = LevelResolver::new(rules, default);
        let uncached = resolver.resolve_level(&entry);

        let hashed = entry.clone().with_hash(hash);
        let first = resolver.resolve_level(&hashed);
        let second = resolver.resolve_level(&hashed);

        prop_assert_eq!(uncached, first);
        prop_assert_eq!(first, second);
        prop_assert_eq!(resolver.cached_sites(), 1);
        prop_assert_eq!(resolver.should_emit(&hashed), first.admits(hashed.level));
    }

    /// Without any rules every call site gets the default threshold
    #[test]
    fn test_empty_rules_yield_default(default in any_filter(), entry in any_entry()) {
        let resolver = LevelResolver::new(RuleNode::new(), default);
        prop_assert_eq!(resolver.resolve_level(&entry), default);
    }
}
