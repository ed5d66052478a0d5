/// Errors produced while registering routes or dispatching a path
///
/// Registration errors are configuration mistakes and surface when the
/// router is built. Dispatch only fails when a redirect chain runs away.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// A `*` segment appeared before the end of a pattern
    #[error("wildcard must be the last segment of route pattern `{pattern}`")]
    MisplacedWildcard { pattern: String },

    /// A `$` segment carried no variable name
    #[error("empty variable name in route pattern `{pattern}`")]
    EmptyVariableName { pattern: String },

    /// More redirects were followed in one dispatch than the router allows
    #[error("redirect limit of {limit} exceeded while dispatching `{path}`")]
    RedirectLimit { path: String, limit: usize },
}
