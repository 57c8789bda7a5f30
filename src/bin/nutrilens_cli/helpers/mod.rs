// ABOUTME: Helper modules for nutrilens-cli
// ABOUTME: Output formatting for meals, progress, and recommendations

pub mod display;
