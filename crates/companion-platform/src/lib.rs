pub mod http;
pub mod storage;
pub mod camera;
pub mod timers;
pub mod navigation;
