use exceptable::constants::error_types::*;
use exceptable::ExceptionKind;
use proptest::prelude::*;

const SINGLE_CODES: [i32; 15] = [
    E_ERROR,
    E_WARNING,
    E_PARSE,
    E_NOTICE,
    E_CORE_ERROR,
    E_CORE_WARNING,
    E_COMPILE_ERROR,
    E_COMPILE_WARNING,
    E_USER_ERROR,
    E_USER_WARNING,
    E_USER_NOTICE,
    E_STRICT,
    E_RECOVERABLE_ERROR,
    E_DEPRECATED,
    E_USER_DEPRECATED,
];

/// Strategy for generating a single runtime error code
pub fn error_code_strategy() -> impl Strategy<Value = i32> {
    prop::sample::select(SINGLE_CODES.to_vec())
}

/// Strategy for generating non-empty error type masks
pub fn error_mask_strategy() -> impl Strategy<Value = i32> {
    1..=E_ALL
}

/// Strategy for generating exception kinds
pub fn exception_kind_strategy() -> impl Strategy<Value = ExceptionKind> {
    prop::sample::select(ExceptionKind::ALL.to_vec())
}

/// Strategy for generating registration sequences of (mask, handled) pairs
pub fn error_handlers_strategy() -> impl Strategy<Value = Vec<(i32, bool)>> {
    prop::collection::vec((error_mask_strategy(), any::<bool>()), 1..8)
}
