use std::path::PathBuf;

use crate::pack::PackError;
use crate::remote::{Catalog, CatalogError, TextureFileEntry, Verdict};

/// Work requested by `update`, executed off the UI thread by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckRemoteControl,
    LoadCatalog,
    BuildPack { entry: TextureFileEntry },
}

// Define the possible messages (Actions)
#[derive(Debug)]
pub enum Message {
    Quit,
    RemoteControlChecked(Verdict),
    CatalogLoaded(Result<Catalog, CatalogError>),
    PackBuilt {
        texture: String,
        result: Result<PathBuf, PackError>,
    },
    Form(FormNavigation),
    Submit,
    RetryCatalog,
    DismissError,
    // Redraw so delayed placeholders appear
    TimerTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormNavigation {
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
}
