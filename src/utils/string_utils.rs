/// Utilitários para mensagens de erro vindas de fora (provedor, arquivos)

/// Limite padrão de uma mensagem de erro por contato no `BulkSendResult`
pub const MAX_ERROR_DETAIL_BYTES: usize = 300;

/// Corta em `max_bytes` sem quebrar um caractere UTF-8
///
/// ```
/// use chatbot_crm_middleware::utils::string_utils::truncate_safe;
///
/// assert_eq!(truncate_safe("Olá, mundo!", 3), "Ol");
/// ```
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Reduz uma mensagem para uma única linha curta
///
/// Quebras de linha e espaços repetidos viram um espaço; se passar de
/// `max_bytes`, corta e adiciona "...".
pub fn single_line_summary(s: &str, max_bytes: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");

    let truncated = truncate_safe(&collapsed, max_bytes);
    if truncated.len() < collapsed.len() {
        format!("{}...", truncated.trim_end())
    } else {
        collapsed
    }
}
