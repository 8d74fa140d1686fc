use std::net::TcpListener;

use nled_core::LedApi;

use crate::dispatcher;

/// Single-client, blocking TCP front end for an [`LedApi`].
///
/// Construction initializes the device registry and binds one zero-filled
/// RGB buffer per panel — the server, not the client, owns these buffers
/// for its whole lifetime; `DrawPanel`/`DrawAll` write directly into them.
pub struct TcpServer {
    port: u16,
    api: LedApi,
    listener: Option<TcpListener>,
}

impl TcpServer {
    pub fn new(port: u16, gamma: f32) -> Self {
        let mut api = LedApi::init_displays(gamma);
        for &panel_id in api.available_display_numbers().to_vec().iter() {
            let byte_size = api.display_byte_size(panel_id) as usize;
            api.set_data(panel_id, &vec![0u8; byte_size]);
        }

        Self { port, api, listener: None }
    }

    /// Binds (first call only) and blocks accepting a single client,
    /// running the command loop until it disconnects or errors, then
    /// closes that connection.
    pub fn start(&mut self) -> std::io::Result<()> {
        let listener = match &self.listener {
            Some(listener) => listener,
            None => {
                let listener = TcpListener::bind(("0.0.0.0", self.port))?;
                log::info!("listening on port {}", self.port);
                self.listener = Some(listener);
                self.listener.as_ref().unwrap()
            }
        };

        let (mut stream, peer) = listener.accept()?;
        log::info!("accepted connection from {peer}");

        dispatcher::run(&mut stream, &mut self.api);

        drop(stream);
        log::info!("connection from {peer} closed");
        Ok(())
    }

    /// `start()` already blocks for exactly one client and returns once
    /// that connection is closed, so restarting is just accepting the
    /// next one on the same listener.
    pub fn restart(&mut self) -> std::io::Result<()> {
        self.start()
    }
}
