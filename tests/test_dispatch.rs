//! Integration tests for the full dispatch pipeline.
//!
//! Drives the dispatcher the way an embedding bot would: raw chat lines
//! plus attachments in, reply text out, with every rejection already
//! worded for the end user.

mod common;

use std::sync::Arc;

use banter::{
    Argument, BindPolicy, Caller, CommandSpec, DispatchError, Dispatcher, PostAction, Registry,
    Validator,
};

use common::{
    attachment, AllowAll, BrokenCommand, DenyAll, GiveCommand, ImportCommand,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dispatcher_with_give() -> Dispatcher {
    let registry = Registry::new();
    registry.register(GiveCommand::boxed());
    Dispatcher::new(registry, Arc::new(AllowAll))
}

fn caller() -> Caller {
    Caller::new("2002")
}

// ---------------------------------------------------------------------------
// Resolution and binding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dispatch_binds_quoted_mandatory_and_keyword() {
    let dispatcher = dispatcher_with_give();

    let reply = dispatcher
        .dispatch(&caller(), "give \"red potion\" amount=3", &[])
        .await
        .expect("handler should succeed");

    assert_eq!(reply.text, "item=red potion amount=3 color=-");
    assert!(reply.post_action.is_none());
}

#[tokio::test]
async fn test_handler_runs_exactly_once() {
    let registry = Registry::new();
    let (command, calls) = GiveCommand::with_counter();
    registry.register(command);
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    dispatcher
        .dispatch(&caller(), "give sword", &[])
        .await
        .expect("handler should succeed");

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_case_folding_lowercases_bound_values() {
    let dispatcher = dispatcher_with_give();

    let reply = dispatcher
        .dispatch(&caller(), "give SWORD color=RED", &[])
        .await
        .expect("handler should succeed");

    assert_eq!(reply.text, "item=sword amount=- color=red");
}

#[test]
fn test_resolve_reports_unknown_trigger() {
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "frobnicate now", &[])
        .expect_err("unknown trigger should be rejected");

    assert_eq!(
        rejection,
        DispatchError::UnknownCommand {
            trigger: "frobnicate".into()
        }
    );
    assert_eq!(rejection.to_string(), "Command \"frobnicate\" unknown!");
}

#[tokio::test]
async fn test_dispatch_folds_rejections_into_reply() {
    let dispatcher = dispatcher_with_give();

    let reply = dispatcher
        .dispatch(&caller(), "frobnicate", &[])
        .await
        .expect("rejections should not surface as errors");

    assert_eq!(reply.text, "Command \"frobnicate\" unknown!");
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unauthorized_caller_never_reaches_handler() {
    let registry = Registry::new();
    let (command, calls) = GiveCommand::with_counter();
    registry.register(command);
    let dispatcher = Dispatcher::new(registry, Arc::new(DenyAll));

    let reply = dispatcher
        .dispatch(&caller(), "give sword", &[])
        .await
        .expect("denial should fold into the reply");

    assert_eq!(reply.text, "You are not authorised to use this command!");
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Count checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_file_count_checked_before_argument_count() {
    let registry = Registry::new();
    registry.register(ImportCommand::boxed());
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    // Both the file slot and the mandatory argument are missing. The file
    // complaint must win.
    let reply = dispatcher
        .dispatch(&caller(), "import", &[])
        .await
        .expect("rejection should fold into the reply");

    assert_eq!(
        reply.text,
        "Not enough files supplied!\nImport takes at least 1, but 0 were supplied!"
    );
}

#[tokio::test]
async fn test_too_many_arguments_hints_at_quoting() {
    let dispatcher = dispatcher_with_give();

    let reply = dispatcher
        .dispatch(&caller(), "give one two three four", &[])
        .await
        .expect("rejection should fold into the reply");

    assert_eq!(
        reply.text,
        "Too many arguments supplied!\nGive takes up to 3, but 4 were supplied!\nAre you \
         trying to give a value with spaces in it? Wrap it in quotes to mark it as one argument."
    );
}

#[test]
fn test_too_few_arguments_rejected() {
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "give", &[])
        .expect_err("missing mandatory argument should be rejected");

    assert_eq!(
        rejection,
        DispatchError::TooFewArguments {
            command: "Give".into(),
            min: 1,
            actual: 0
        }
    );
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_invalid_value_names_argument_and_requirement() {
    let dispatcher = dispatcher_with_give();

    let reply = dispatcher
        .dispatch(&caller(), "give sword amount=-1", &[])
        .await
        .expect("rejection should fold into the reply");

    assert_eq!(
        reply.text,
        "-1 is not a valid value for amount! Must be a number greater than or equal to zero!"
    );
}

#[test]
fn test_strict_policy_rejects_bare_extra_tokens() {
    let registry = Registry::new();
    registry.register(GiveCommand::boxed());
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll)).with_policy(BindPolicy {
        strict_keyword_syntax: true,
    });

    let rejection = dispatcher
        .resolve(&caller(), "give sword 3", &[])
        .expect_err("bare extra token should be rejected under the strict policy");

    assert_eq!(rejection, DispatchError::MangledInput { token: "3".into() });
}

#[test]
fn test_relaxed_policy_binds_bare_extras_positionally() {
    let dispatcher = dispatcher_with_give();

    let invocation = dispatcher
        .resolve(&caller(), "give sword 3 blue", &[])
        .expect("bare extras should bind under the relaxed policy");

    assert_eq!(invocation.arguments.get("amount"), Some("3"));
    assert_eq!(invocation.arguments.get("color"), Some("blue"));
}

#[test]
fn test_unknown_keyword_rejected() {
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "give sword shine=full", &[])
        .expect_err("undeclared keyword should be rejected");

    assert_eq!(
        rejection,
        DispatchError::UnknownArgument {
            key: "shine".into()
        }
    );
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_attachment_bound_by_slot() {
    let registry = Registry::new();
    registry.register(ImportCommand::boxed());
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let reply = dispatcher
        .dispatch(&caller(), "import 2", &[attachment("save.json")])
        .await
        .expect("handler should succeed");

    assert_eq!(reply.text, "loaded save.json into slot 2");
}

#[tokio::test]
async fn test_wrong_extension_rejected() {
    let registry = Registry::new();
    registry.register(ImportCommand::boxed());
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let reply = dispatcher
        .dispatch(&caller(), "import 2", &[attachment("save.txt")])
        .await
        .expect("rejection should fold into the reply");

    assert_eq!(
        reply.text,
        "save.txt is not a valid file for save! Must be of filetype json!"
    );
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_post_action_surfaced_in_reply() {
    struct Restart {
        spec: CommandSpec,
    }

    #[async_trait::async_trait]
    impl banter::ChatCommand for Restart {
        fn spec(&self) -> &CommandSpec {
            &self.spec
        }

        async fn execute(
            &self,
            _ctx: &banter::CommandContext,
            _args: &banter::BoundArguments,
            _files: &banter::BoundFiles,
        ) -> anyhow::Result<String> {
            Ok("Restarting!".into())
        }
    }

    let registry = Registry::new();
    registry.register(Box::new(Restart {
        spec: CommandSpec::new("Restart", "restart", "Restarts the bot").with_post_action(
            PostAction::with_data("restart", serde_json::json!({"delay_seconds": 5})),
        ),
    }));
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let reply = dispatcher
        .dispatch(&caller(), "restart", &[])
        .await
        .expect("handler should succeed");

    assert_eq!(reply.text, "Restarting!");
    let action = reply.post_action.expect("post action should be surfaced");
    assert_eq!(action.action, "restart");
    assert_eq!(action.data, Some(serde_json::json!({"delay_seconds": 5})));
}

#[tokio::test]
async fn test_handler_failure_propagates_as_error() {
    let registry = Registry::new();
    registry.register(BrokenCommand::boxed());
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let error = dispatcher
        .dispatch(&caller(), "broken", &[])
        .await
        .expect_err("handler failure should not fold into the reply");

    assert!(error.to_string().contains("exploded"));
}

// ---------------------------------------------------------------------------
// Aliases and ordering
// ---------------------------------------------------------------------------

#[test]
fn test_alias_resolves_to_same_command() {
    let registry = Registry::new();
    registry.register(Box::new(AliasedPing {
        spec: CommandSpec::new("Ping", "ping", "Measures latency").alias("p"),
    }));
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let invocation = dispatcher
        .resolve(&caller(), "p", &[])
        .expect("alias should resolve");
    assert_eq!(invocation.command.spec().name(), "Ping");
}

#[test]
fn test_trigger_comparison_is_exact() {
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "GIVE sword", &[])
        .expect_err("trigger lookup should be case-sensitive");

    assert_eq!(
        rejection,
        DispatchError::UnknownCommand {
            trigger: "GIVE".into()
        }
    );
}

#[test]
fn test_tab_joined_first_token_is_unknown() {
    // Only space and newline separate tokens, so a tab-joined first token
    // is looked up whole and matches nothing.
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "give\tjunk sword", &[])
        .expect_err("tab-joined first token should not resolve");

    assert_eq!(
        rejection,
        DispatchError::UnknownCommand {
            trigger: "give\tjunk".into()
        }
    );
}

#[tokio::test]
async fn test_leading_separators_do_not_hide_the_trigger() {
    let dispatcher = dispatcher_with_give();

    for line in ["  give sword", "\ngive sword"] {
        let reply = dispatcher
            .dispatch(&caller(), line, &[])
            .await
            .expect("handler should succeed");
        assert_eq!(reply.text, "item=sword amount=- color=-", "line: {line:?}");
    }
}

struct AliasedPing {
    spec: CommandSpec,
}

#[async_trait::async_trait]
impl banter::ChatCommand for AliasedPing {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        _ctx: &banter::CommandContext,
        _args: &banter::BoundArguments,
        _files: &banter::BoundFiles,
    ) -> anyhow::Result<String> {
        Ok("Pong!".into())
    }
}

// ---------------------------------------------------------------------------
// Quoting edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_keyword_value_with_spaces_binds_whole_quoted_token() {
    let registry = Registry::new();
    registry.register(Box::new(AliasedPing {
        spec: CommandSpec::new("Note", "note", "Stores a note").argument(
            Argument::new("text", "The note text", Validator::IsString).keyword(),
        ),
    }));
    let dispatcher = Dispatcher::new(registry, Arc::new(AllowAll));

    let invocation = dispatcher
        .resolve(&caller(), "note \"text=red and blue\"", &[])
        .expect("quoted keyword token should bind");

    assert_eq!(invocation.arguments.get("text"), Some("red and blue"));
}

#[test]
fn test_value_containing_equals_is_mangled() {
    let dispatcher = dispatcher_with_give();

    let rejection = dispatcher
        .resolve(&caller(), "give sword amount=3=4", &[])
        .expect_err("double equals should be rejected");

    assert_eq!(
        rejection,
        DispatchError::MangledInput {
            token: "amount=3=4".into()
        }
    );
}
