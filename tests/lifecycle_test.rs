//! Lifecycle Tests
//!
//! Registration against recording and process-global hook tables, scoped `try_run`,
//! and scoped error policies.

mod common;

use common::{recording_handler, CallLog};
use exceptable::constants::error_types::*;
use exceptable::{
    ErrorCase, ErrorTypes, ExceptableError, Exception, ExceptionKind, Handler, HandlerOptions,
    HookEvent, HookTable, ProcessHooks, RuntimeError, SplError,
};
use serde_json::json;
use serial_test::serial;

#[test]
fn register_then_unregister_round_trip() {
    let (handler, hooks) = recording_handler(HandlerOptions::default());

    handler.register();
    handler.unregister();
    assert!(!handler.is_registered());
    assert_eq!(hooks.error_hook_depth(), 0);
    assert_eq!(hooks.exception_hook_depth(), 0);

    hooks.clear_events();
    handler.register();
    assert_eq!(
        hooks.events(),
        vec![
            HookEvent::SetErrorHook {
                types: ErrorTypes::ALL
            },
            HookEvent::SetExceptionHook,
        ]
    );
    assert_eq!(hooks.shutdown_hook_count(), 1);
    handler.unregister();
}

#[test]
fn unregistered_handler_ignores_shutdown() {
    let (handler, hooks) = recording_handler(HandlerOptions::default());
    let calls = CallLog::new();
    handler.on_shutdown(calls.shutdown_handler("flush"));

    handler.register();
    handler.unregister();
    hooks.fire_shutdown();
    assert!(calls.calls().is_empty());
}

#[test]
fn dropped_handler_leaves_inert_shutdown_hook() {
    let (handler, hooks) = recording_handler(HandlerOptions::default());
    let calls = CallLog::new();
    handler.on_shutdown(calls.shutdown_handler("flush"));
    handler.register().unregister();
    drop(handler);

    hooks.fire_shutdown();
    assert!(calls.calls().is_empty());
}

#[test]
fn second_handler_shadows_first() {
    let (first, hooks) = recording_handler(HandlerOptions::default());
    let second = Handler::with_hooks(HandlerOptions::default(), hooks.clone());
    let calls = CallLog::new();
    first.on_error(calls.error_handler("first", true), -1).unwrap();
    second.on_error(calls.error_handler("second", true), -1).unwrap();

    first.register();
    second.register();
    hooks.fire_error(&RuntimeError::new(E_NOTICE, "n"));
    second.unregister();
    hooks.fire_error(&RuntimeError::new(E_NOTICE, "n"));
    first.unregister();

    assert_eq!(calls.calls(), vec!["second", "first"]);
}

#[test]
fn try_run_restores_unregistered_state_on_failure() {
    let (handler, hooks) = recording_handler(HandlerOptions::default().with_debug(true));

    let result = handler.try_run(|| -> Result<u8, Exception> {
        Err(SplError::UnexpectedValue.exceptable(json!({"value": "abc"}), None))
    });

    let uncaught = result.unwrap_err();
    assert!(uncaught.is(&ExceptableError::UncaughtException));
    assert!(uncaught.has(&SplError::UnexpectedValue));
    assert!(!handler.is_registered());
    assert_eq!(hooks.error_hook_depth(), 0);
    assert_eq!(handler.debug_log().len(), 1);
}

#[test]
fn try_run_handled_failure_returns_none() {
    let (handler, _) = recording_handler(HandlerOptions::default());
    let calls = CallLog::new();
    handler.on_exception(calls.exception_handler("logic", true), ExceptionKind::Logic, 0);

    let result = handler.try_run(|| -> Result<String, Exception> {
        Err(Exception::new(ExceptionKind::Length, "too long"))
    });
    assert!(matches!(result, Ok(None)));
    assert_eq!(calls.calls(), vec!["logic"]);
}

#[test]
fn error_policy_throws_inside_scope_only() {
    let (handler, hooks) = recording_handler(HandlerOptions::default());
    handler.register();

    let inside = handler.run_with_error_policy(
        || hooks.fire_error(&RuntimeError::new(E_USER_WARNING, "strict mode")),
        E_USER_WARNING,
    );
    let exception = inside.unwrap().unwrap_err();
    assert_eq!(exception.kind(), ExceptionKind::ErrorException);
    assert_eq!(exception.message(), "strict mode");

    let outside = hooks.fire_error(&RuntimeError::new(E_USER_WARNING, "lenient"));
    assert!(matches!(outside, Some(Ok(false))));
    assert_eq!(hooks.error_hook_depth(), 1);
    handler.unregister();
}

#[test]
#[serial]
fn process_hooks_end_to_end() {
    ProcessHooks::reset();
    let handler = Handler::new(HandlerOptions::default().with_debug(true));
    let calls = CallLog::new();
    handler
        .on_error(calls.error_handler("warnings", true), E_WARNING)
        .unwrap()
        .on_exceptable(calls.exception_handler("ranges", true), &[&SplError::Range])
        .unwrap()
        .on_shutdown(calls.shutdown_handler("shutdown"));
    handler.register();

    assert!(ProcessHooks::trigger_error(RuntimeError::new(E_WARNING, "w")).unwrap());
    assert!(!ProcessHooks::trigger_error(RuntimeError::new(E_NOTICE, "n")).unwrap());
    assert!(ProcessHooks::raise(SplError::Range.exceptable(json!({}), None)).is_ok());
    assert!(ProcessHooks::raise(Exception::new(ExceptionKind::Logic, "x")).is_err());

    ProcessHooks::run_shutdown();
    assert_eq!(calls.calls(), vec!["warnings", "ranges", "shutdown"]);
    assert_eq!(handler.debug_log().len(), 4);

    handler.unregister();
    assert_eq!(ProcessHooks::error_hook_count(), 0);
    ProcessHooks::reset();
}

#[test]
#[serial]
fn process_silence_marks_errors_controlled() {
    ProcessHooks::reset();
    let handler = Handler::new(HandlerOptions::default().with_debug(true));
    let calls = CallLog::new();
    handler.on_error(calls.error_handler("any", true), -1).unwrap();
    handler.register();

    let handled = ProcessHooks::silence(|| ProcessHooks::trigger_error(RuntimeError::new(E_NOTICE, "hush")));
    assert!(handled.unwrap());
    assert!(calls.calls().is_empty());
    assert!(handler.debug_log()[0].controlled());

    handler.set_scream(true);
    ProcessHooks::silence(|| ProcessHooks::trigger_error(RuntimeError::new(E_NOTICE, "loud"))).unwrap();
    assert_eq!(calls.calls(), vec!["any"]);

    handler.unregister();
    ProcessHooks::reset();
}

#[test]
#[serial]
fn fatal_error_dispatched_at_shutdown() {
    ProcessHooks::reset();
    let handler = Handler::new(HandlerOptions::default());
    let calls = CallLog::new();
    handler
        .on_error(calls.error_handler("fatal", true), E_ERROR)
        .unwrap()
        .on_shutdown(calls.shutdown_handler("shutdown"));
    handler.register();

    assert!(!ProcessHooks::trigger_error(RuntimeError::new(E_ERROR, "allocation failed")).unwrap());
    assert!(calls.calls().is_empty());
    assert_eq!(ProcessHooks.last_error().map(|e| e.code), Some(E_ERROR));

    ProcessHooks::run_shutdown();
    assert_eq!(calls.calls(), vec!["fatal", "shutdown"]);

    handler.unregister();
    ProcessHooks::reset();
}

#[test]
#[serial]
fn run_guarded_routes_panics_through_registered_handler() {
    ProcessHooks::reset();
    let handler = Handler::new(HandlerOptions::default());
    let calls = CallLog::new();
    handler.on_exception(calls.exception_handler("runtime", true), ExceptionKind::Runtime, 0);
    handler.register();

    let result: Result<Option<()>, Exception> =
        ProcessHooks::run_guarded(|| panic!("worker thread died"));
    assert!(matches!(result, Ok(None)));
    assert_eq!(calls.calls(), vec!["runtime"]);

    handler.unregister();
    ProcessHooks::reset();
}

#[test]
#[serial]
fn error_policy_installs_temporary_process_hook() {
    ProcessHooks::reset();
    let handler = Handler::new(HandlerOptions::default());

    let result = handler.run_with_error_policy(
        || ProcessHooks::trigger_error(RuntimeError::new(E_DEPRECATED, "old call")),
        E_DEPRECATED,
    );
    assert_eq!(result.unwrap_err().code(), i64::from(E_DEPRECATED));
    assert_eq!(ProcessHooks::error_hook_count(), 0);
    assert!(matches!(
        ProcessHooks::trigger_error(RuntimeError::new(E_DEPRECATED, "old call")),
        Ok(false)
    ));
    ProcessHooks::reset();
}
