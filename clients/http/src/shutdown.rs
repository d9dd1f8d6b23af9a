use flume::{Receiver, Sender};

/// Fires once when the process receives SIGINT or SIGTERM
pub struct ShutdownSignal {
    receiver: Receiver<()>,
}

impl ShutdownSignal {
    /// Registers the process wide signal handler. Can only be called once per process.
    pub fn install() -> Result<ShutdownSignal, ctrlc::Error> {
        let (sender, signal) = ShutdownSignal::channel();

        ctrlc::set_handler(move || {
            // Bounded to one, repeated signals while shutting down are dropped
            let _ = sender.try_send(());
        })?;

        Ok(signal)
    }

    fn channel() -> (Sender<()>, ShutdownSignal) {
        let (sender, receiver) = flume::bounded::<()>(1);

        (sender, ShutdownSignal { receiver })
    }

    /// Resolves on the first signal. Also resolves if the handler is dropped, which only
    /// happens when the process is already going away.
    pub async fn recv(self) {
        let _ = self.receiver.recv_async().await;
    }
}
