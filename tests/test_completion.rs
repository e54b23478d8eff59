//! Integration tests for tab completion

#[path = "common/mod.rs"]
mod common;
use common::{complete_name, engine, Engine, Invocation};

fn noop(_: &mut Invocation<'_>) -> std::io::Result<()> {
    Ok(())
}

fn router() -> Engine {
    let mut engine = engine();
    engine.register_completer("name", complete_name).unwrap();
    engine
        .register_completer("iface", |partial: &str| {
            ["eth0", "eth1", "lo", "eth0"]
                .iter()
                .filter(|i| i.starts_with(partial))
                .map(|i| i.to_string())
                .collect()
        })
        .unwrap();
    for desc in [
        "show version",
        "show interfaces $1:iface",
        "show ip route",
        "shutdown",
        "ping $1",
    ] {
        engine.register_command("main", desc, noop).unwrap();
    }
    engine
}

fn assert_clean(suggestions: &[String]) {
    let mut sorted = suggestions.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, suggestions, "suggestions must be sorted and unique");
    assert!(suggestions.iter().all(|s| !s.is_empty()));
}

#[test]
fn test_first_words() {
    let engine = router();
    let suggestions = engine.suggest("");
    assert_eq!(suggestions, vec!["ping", "show", "shutdown"]);
    assert_clean(&suggestions);
}

#[test]
fn test_prefix_of_first_word() {
    let engine = router();
    assert_eq!(engine.suggest("sh"), vec!["show", "shutdown"]);
    assert_eq!(engine.suggest("shu"), vec!["shutdown"]);
    assert!(engine.suggest("zz").is_empty());
}

#[test]
fn test_completer_duplicates_removed() {
    let engine = router();
    let suggestions = engine.suggest("show interfaces");
    assert_eq!(
        suggestions,
        vec!["show interfaces eth0", "show interfaces eth1", "show interfaces lo"]
    );
    assert_clean(&suggestions);
    assert_eq!(
        engine.suggest("show interfaces e"),
        vec!["show interfaces eth0", "show interfaces eth1"]
    );
}

#[test]
fn test_partial_beats_exact() {
    let mut engine = engine();
    engine.register_completer("name", complete_name).unwrap();
    engine.register_command("main", "show $1:name", noop).unwrap();
    engine.register_command("main", "showall", noop).unwrap();

    // "show $1:name" would offer a name after "show", but "showall" finishes
    // the word being typed, and that wins
    assert_eq!(engine.suggest("show"), vec!["showall"]);
    // with nothing to finish, the names come back
    assert_eq!(
        engine.suggest("show E"),
        vec!["show Eleanore", "show Elizabeth", "show Ellen"]
    );
}

fn greeter() -> Engine {
    let mut engine = engine();
    engine.register_completer("name", complete_name).unwrap();
    engine.register_command("main", "hello $*:name", noop).unwrap();
    engine.register_command("main", "bye", noop).unwrap();
    engine
}

#[test]
fn test_wildcard_keeps_completing() {
    let engine = greeter();
    assert_eq!(
        engine.suggest("hello"),
        vec!["hello Eleanore", "hello Elizabeth", "hello Ellen", "hello Todd"]
    );
    assert_eq!(
        engine.suggest("hello Todd Eli"),
        vec!["hello Todd Elizabeth"]
    );
    // a completed name has nothing new to offer
    assert!(engine.suggest("hello Todd").is_empty());
}

#[test]
fn test_wildcard_completes_after_any_leading_words() {
    let engine = greeter();
    // once the line is as long as "hello $*", only the last word counts
    assert_eq!(engine.suggest("bye Ell"), vec!["bye Ellen"]);
    assert!(engine.suggest("bye").is_empty());
}

#[test]
fn test_placeholder_without_completer() {
    let engine = router();
    assert!(engine.suggest("ping").is_empty());
}

#[test]
fn test_only_last_statement_completed() {
    let engine = router();
    assert_eq!(engine.suggest("ping x; shu"), vec!["shutdown"]);
}

#[test]
fn test_suggestions_follow_active_set() {
    let mut engine = router();
    engine.new_command_set("config").unwrap();
    engine.register_command("config", "hostname $1", noop).unwrap();
    engine.register_command("config", "end", noop).unwrap();
    engine.push_command_set("config").unwrap();
    assert_eq!(engine.suggest(""), vec!["end", "hostname"]);
    engine.pop_command_set().unwrap();
    assert_eq!(engine.suggest("p"), vec!["ping"]);
}
