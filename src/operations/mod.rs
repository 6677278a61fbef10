//! Operations Module
//!
//! Per-command reply grammars plugged into the reply engine.
//!
//! | Command      | Body code | Empty codes     | Reject codes |
//! |--------------|-----------|-----------------|--------------|
//! | `DEFINE`     | 150       | 550, 552        |              |
//! | `MATCH`      | 152       | 550, 551, 552   |              |
//! | `SHOW DB`    | 110       | 554             |              |
//! | `SHOW STRAT` | 111       | 555             |              |
//! | `SHOW INFO`  | 112       |                 | 550          |

mod define;
mod listing;
mod info;

pub use define::{DefineHandler, DEFINE_STATUS};
pub use listing::{
    DatabaseListHandler, MatchEntryHandler, MatchHandler, StrategyListHandler, MATCH_STATUS,
    SHOW_DB_STATUS, SHOW_STRAT_STATUS,
};
pub use info::{InfoHandler, SHOW_INFO_STATUS};
