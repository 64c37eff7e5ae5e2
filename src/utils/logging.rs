use tracing::{info, warn, error, debug};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_bulk_send_started(tenant_id: &str, phone_id: &str, template: &str, trigger: &str) {
    info!("📨 Bulk send ({}) requested: tenant {} - phone {} - template '{}'",
          trigger, tenant_id, phone_id, template);
}

pub fn log_bulk_send_completed(template: &str, total: usize, successful: usize, failed: usize) {
    if failed == 0 {
        info!("✅ Bulk send '{}' completed: {}/{} sent", template, successful, total);
    } else {
        warn!("⚠️ Bulk send '{}' completed with failures: {}/{} sent - {} failed",
              template, successful, total, failed);
    }
}

pub fn log_bulk_send_rejected(template: &str, reason: &str) {
    warn!("❌ Bulk send '{}' rejected: {}", template, reason);
}

pub fn log_whatsapp_api_error(phone_number_id: &str, status: Option<u16>, error: &str) {
    error!("WhatsApp API error: phone {} - Status: {:?} - Error: {}", phone_number_id, status, error);
}

pub fn log_directory_loaded(path: &str, tenants: usize, contacts: usize) {
    info!("📇 Directory loaded from {}: {} tenants - {} contacts", path, tenants, contacts);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 Chatbot CRM middleware server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_integration_status_check() {
    debug!("Integration status check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
