mod model;
mod repository;

pub use model::{PriceAveragesDB, PriceRecordDB};
pub use repository::PriceRecordRepository;
