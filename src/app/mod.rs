// 應用層：在 GUI 之外驅動協調器的元件

pub mod console;
pub mod grid;
