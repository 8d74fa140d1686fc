use std::net::TcpStream;

use nled_core::LedApi;

use crate::command;
use crate::error::CommandError;

/// One variant per wire command id. `dispatch` is a plain match rather
/// than a trait-object vtable — there are five fixed ids, not an
/// extensible registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    GetConfig,
    DrawPanel,
    DrawAll,
    Flush,
    SetDebugMode,
}

fn dispatch(id: i32) -> Option<Command> {
    match id {
        nled_proto::command::GET_CONFIG => Some(Command::GetConfig),
        nled_proto::command::DRAW_PANEL => Some(Command::DrawPanel),
        nled_proto::command::DRAW_ALL => Some(Command::DrawAll),
        nled_proto::command::FLUSH => Some(Command::Flush),
        nled_proto::command::SET_DEBUG_MODE => Some(Command::SetDebugMode),
        _ => None,
    }
}

/// Runs the command loop for one accepted connection until the peer
/// disconnects or an I/O error occurs. Unknown command ids are logged and
/// skipped; the connection stays open. A handler failure closes the
/// session.
pub fn run(stream: &mut TcpStream, api: &mut LedApi) {
    loop {
        let id = match nled_proto::read_i32(stream) {
            Ok(id) => id,
            Err(nled_proto::ProtoError::Io(err)) if nled_proto::is_clean_eof(&err) => {
                log::info!("client disconnected");
                return;
            }
            Err(err) => {
                log::error!("socket read failed: {err}");
                return;
            }
        };

        let command = match dispatch(id) {
            Some(command) => command,
            None => {
                log::warn!("unknown command id {id}, ignoring");
                continue;
            }
        };

        log::debug!("dispatching {command:?}");
        if let Err(err) = handle(command, stream, api) {
            log::error!("command {command:?} failed, closing session: {err}");
            return;
        }
    }
}

fn handle(command: Command, stream: &mut TcpStream, api: &mut LedApi) -> Result<(), CommandError> {
    match command {
        Command::GetConfig => command::get_config(stream, api),
        Command::DrawPanel => command::draw_panel(stream, api),
        Command::DrawAll => command::draw_all(stream, api),
        Command::Flush => command::flush(api),
        Command::SetDebugMode => command::set_debug_mode(stream, api),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_maps_every_known_id() {
        assert_eq!(dispatch(0), Some(Command::GetConfig));
        assert_eq!(dispatch(1), Some(Command::DrawPanel));
        assert_eq!(dispatch(2), Some(Command::DrawAll));
        assert_eq!(dispatch(3), Some(Command::Flush));
        assert_eq!(dispatch(4), Some(Command::SetDebugMode));
        assert_eq!(dispatch(5), None);
        assert_eq!(dispatch(-1), None);
    }
}
