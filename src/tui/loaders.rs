use crossbeam_channel::Sender;

use crate::pack::{build_pack, save_pack};
use crate::remote::catalog::load_catalog;
use crate::remote::kill_switch::check_allowed;
use crate::tui::message::{Command, Message};
use crate::tui::model::AppState;

impl AppState {
    /// Run queued effects on worker threads. Results come back as messages on
    /// `tx`, so the session and form are only ever touched by the UI thread.
    pub fn run_effects(&mut self, tx: &Sender<Message>) {
        for command in std::mem::take(&mut self.effects) {
            let tx = tx.clone();
            let fetcher = self.session.fetcher();
            crate::logger::logln(&format!("Running {command:?}"));

            match command {
                Command::CheckRemoteControl => {
                    let settings = self.session.config().remote_control.clone();
                    let launch = self.session.launch();
                    std::thread::spawn(move || {
                        let verdict = check_allowed(fetcher.as_ref(), &settings, launch);
                        let _ = tx.send(Message::RemoteControlChecked(verdict));
                    });
                }
                Command::LoadCatalog => {
                    let settings = self.session.config().catalog.clone();
                    std::thread::spawn(move || {
                        let result = load_catalog(fetcher.as_ref(), &settings);
                        let _ = tx.send(Message::CatalogLoaded(result));
                    });
                }
                Command::BuildPack { entry } => {
                    let directory = self.session.config().output.directory.clone();
                    std::thread::spawn(move || {
                        let result = build_pack(fetcher.as_ref(), &entry)
                            .and_then(|pack| save_pack(&pack, &directory));
                        let _ = tx.send(Message::PackBuilt {
                            texture: entry.name,
                            result,
                        });
                    });
                }
            }
        }
    }
}
