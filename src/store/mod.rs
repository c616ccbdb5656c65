pub mod sheet;

pub use sheet::SheetStore;
