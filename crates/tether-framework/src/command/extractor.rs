use std::ops::Deref;

use crate::context::HandlerContext;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::FromContext;

/// The raw tokens following the command name, unparsed.
///
/// ```rust,ignore
/// fn testing(args: Args, logger: Logger) -> bool {
///     logger.log(&args.join(", "));
///     true
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(pub Vec<String>);

impl Args {
    /// Unwraps the token list.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Args {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromContext for Args {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        ctx.args()
            .map(|args| Args(args.to_vec()))
            .ok_or(ExtractError::NotACommand)
    }
}

/// The name the command was invoked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandName(pub String);

impl FromContext for CommandName {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        ctx.command()
            .map(|name| CommandName(name.to_string()))
            .ok_or(ExtractError::NotACommand)
    }
}
