// src/services/document.rs

use crate::common::error::AppError;

/// Aplica a máscara de CPF (11 dígitos) ou CNPJ (14 dígitos).
///
/// Qualquer outro tamanho é erro; não tentamos adivinhar a máscara.
pub fn format_tax_document(digits: &str) -> Result<String, AppError> {
    let len = digits.chars().count();
    if len != 11 && len != 14 {
        return Err(AppError::InvalidDocumentLength(len));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidDocumentCharacters);
    }

    let formatted = if len == 11 {
        // XXX.XXX.XXX-XX
        format!("{}.{}.{}-{}", &digits[0..3], &digits[3..6], &digits[6..9], &digits[9..11])
    } else {
        // XX.XXX.XXX/XXXX-XX
        format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        )
    };

    Ok(formatted)
}

/// Versão para exibição: se não der para formatar, mostra o valor original.
pub fn display_tax_document(raw: &str) -> String {
    match format_tax_document(raw) {
        Ok(formatted) => formatted,
        Err(e) => {
            tracing::warn!(document = raw, "Documento exibido sem máscara: {}", e);
            raw.to_string()
        }
    }
}
