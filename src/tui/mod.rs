pub mod history_modal;

pub use history_modal::{HistoryModal, ModalAction};
