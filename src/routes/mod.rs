/// Router Module Index
///
/// Splits routes by access level so the bearer-token middleware is applied to a
/// whole router at once instead of per handler.

/// Routes accessible without a token: health, signup and login.
pub mod public;

/// Routes behind the bearer-token middleware. Handlers receive the verified
/// identity as an `AuthUser` argument.
pub mod authenticated;
