// 領域層：核心模型與介面（ports），只依賴 std

pub mod model;
pub mod ports;
