// Re-export broccoli_queue's tuning types; queue names and pool sizing
// live in `common::config::MqAppConfig`.
pub type PublishConfig = broccoli_queue::queue::PublishOptions;
pub type ConsumeConfig = broccoli_queue::queue::ConsumeOptions;
