//! Autosave - 编辑器草稿的防抖自动保存

mod controller;

pub use controller::{
    AutosaveConfig, AutosaveController, AutosaveError, AutosavePhase, AutosaveStatus,
};
