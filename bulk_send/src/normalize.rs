//! Normalização de nomes de tags e números de telefone

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Menor número de dígitos aceito como destino
pub const MIN_PHONE_DIGITS: usize = 8;

/// Remove acentos (NFKD), converte para lowercase e colapsa espaços
///
/// ```
/// use bulk_send::normalize::normalize_tag;
///
/// assert_eq!(normalize_tag("Clientés  VIP"), "clientes vip");
/// assert_eq!(normalize_tag("  promoção "), "promocao");
/// ```
pub fn normalize_tag(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mantém apenas os dígitos do número; `None` se sobrar menos que `MIN_PHONE_DIGITS`
///
/// ```
/// use bulk_send::normalize::normalize_phone_number;
///
/// assert_eq!(normalize_phone_number("+55 (11) 98888-7777").as_deref(), Some("5511988887777"));
/// assert_eq!(normalize_phone_number("123"), None);
/// ```
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < MIN_PHONE_DIGITS {
        None
    } else {
        Some(digits)
    }
}
