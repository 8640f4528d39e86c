//! The help command.

use dotma_dispatch::{Action, Command, MessageState};

const HELP_TEXT: &str = "```\n\
Commands (prefix with ! or !f):\n\
  ping              - pong\n\
  <no keyword>      - ping all current targets\n\
  help              - this text\n\
  auto <n> <delay>  - repeat the target ping n times (costs coins)\n\
  stop              - stop a running auto ping\n\
  targetlist        - list current targets\n\
  target <@user>    - ask a user to become a target\n\
  removeself        - remove yourself from the target list\n\
  shop              - list shop items\n\
```";

/// `help`: sends the command overview.
pub fn help() -> Command {
    Command::executable(
        "help",
        0,
        Action::new(|state: MessageState, _args| async move {
            state.send(HELP_TEXT).await?;
            Ok(())
        }),
    )
}
