/// Router Module Index
///
/// Routes are split by access level so the session check is applied to a whole
/// router at once instead of per handler.

/// Routes open to anonymous visitors: listing, submission, login and logout.
pub mod public;

/// Routes wrapped by the `require_admin` session check.
pub mod authenticated;
