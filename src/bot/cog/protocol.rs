//! The inter-bot protocol has no commands of its own; requests are handled from
//! the message event by `service::protocol`. The cog exists so that help lists
//! the feature.

use crate::command::Command;

pub fn commands() -> Vec<Command> {
    Vec::new()
}
