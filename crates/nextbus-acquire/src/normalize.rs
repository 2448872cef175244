use unicode_normalization::UnicodeNormalization;

/// Normalize text pulled out of a table cell.
///
/// Converts to NFC (the board uses accented Spanish names such as
/// "Pza. España") and trims surrounding whitespace. Inner spacing is left
/// exactly as the page has it.
pub fn clean_cell_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();

    nfc.trim().to_string()
}
