//! CODE128 symbology: ASCII text to bar/space modules and back.

use image::GrayImage;

use crate::error::{DecodeError, EncodingError};

/// Bar/space widths for symbol values 0..=105, then the stop pattern.
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212", "221213",
    "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221", "223211", "221132",
    "221231", "213212", "223112", "312131", "311222", "321122", "321221", "312212", "322112", "322211",
    "212123", "212321", "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313",
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121", "313121", "211331",
    "231131", "213113", "213311", "213131", "311123", "311321", "331121", "312113", "312311", "332111",
    "314111", "221411", "431111", "111224", "111422", "121124", "121421", "141122", "141221", "112214",
    "112412", "122114", "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111",
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311", "113141",
    "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: u8 = 106;
const TO_C: u8 = 99;
const TO_B: u8 = 100;
const TO_A: u8 = 101;

const SYMBOL_MODULES: usize = 11;
const STOP_MODULES: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    fn start(self) -> u8 {
        match self {
            Self::A => START_A,
            Self::B => START_B,
            Self::C => START_C,
        }
    }

    fn switch(self) -> u8 {
        match self {
            Self::A => TO_A,
            Self::B => TO_B,
            Self::C => TO_C,
        }
    }
}

/// An encoded symbol: start code, data, checksum, stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    codes: Vec<u8>,
}

impl Code128 {
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn module_count(&self) -> usize {
        (self.codes.len() - 1) * SYMBOL_MODULES + STOP_MODULES
    }

    /// `true` is a bar. Quiet zones are left to the caller.
    pub fn modules(&self) -> Vec<bool> {
        let mut out = Vec::with_capacity(self.module_count());
        for &code in &self.codes {
            for (i, w) in PATTERNS[code as usize].bytes().enumerate() {
                let bar = i % 2 == 0;
                out.extend(std::iter::repeat(bar).take((w - b'0') as usize));
            }
        }
        out
    }
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Encode `value` picking code sets automatically: C for even digit runs of
/// four or more (or a two-digit value), A only where control characters need
/// it, B otherwise.
pub fn encode(value: &str) -> Result<Code128, EncodingError> {
    if value.is_empty() {
        return Err(EncodingError::Empty);
    }
    if let Some((position, ch)) = value.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(EncodingError::UnsupportedChar { ch, position });
    }

    let bytes = value.as_bytes();
    let mut codes: Vec<u8> = Vec::with_capacity(bytes.len() + 4);
    let mut set: Option<CodeSet> = None;
    let mut i = 0;

    while i < bytes.len() {
        let run = digit_run(bytes, i);
        let want_c = match set {
            Some(CodeSet::C) => run >= 2,
            _ => (run >= 4 && run % 2 == 0) || (i == 0 && run == 2 && bytes.len() == 2),
        };

        let next = if want_c {
            CodeSet::C
        } else {
            let c = bytes[i];
            match set {
                Some(CodeSet::A) if c < 96 => CodeSet::A,
                Some(CodeSet::B) if c >= 32 => CodeSet::B,
                _ if c < 32 => CodeSet::A,
                _ => CodeSet::B,
            }
        };

        match set {
            None => codes.push(next.start()),
            Some(cur) if cur != next => codes.push(next.switch()),
            _ => {}
        }
        set = Some(next);

        match next {
            CodeSet::C => {
                codes.push((bytes[i] - b'0') * 10 + (bytes[i + 1] - b'0'));
                i += 2;
            }
            CodeSet::A => {
                let c = bytes[i];
                codes.push(if c < 32 { c + 64 } else { c - 32 });
                i += 1;
            }
            CodeSet::B => {
                codes.push(bytes[i] - 32);
                i += 1;
            }
        }
    }

    codes.push(checksum(&codes));
    codes.push(STOP);
    Ok(Code128 { codes })
}

fn checksum(codes: &[u8]) -> u8 {
    let sum = codes
        .iter()
        .enumerate()
        .map(|(i, &c)| c as u32 * (i as u32).max(1))
        .sum::<u32>();
    (sum % 103) as u8
}

fn pattern_of(modules: &[bool]) -> Option<String> {
    if modules.first() != Some(&true) {
        return None;
    }
    let mut widths = String::with_capacity(7);
    let mut run = 1;
    for pair in modules.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
        } else {
            widths.push(char::from_digit(run, 10)?);
            run = 1;
        }
    }
    widths.push(char::from_digit(run, 10)?);
    Some(widths)
}

/// Decode a module sequence (bars `true`), tolerating quiet zones.
pub fn decode(modules: &[bool]) -> Result<String, DecodeError> {
    let first = modules.iter().position(|&m| m).ok_or(DecodeError::NoSymbol)?;
    let last = modules.iter().rposition(|&m| m).ok_or(DecodeError::NoSymbol)?;
    let body = &modules[first..=last];

    if body.len() < 3 * SYMBOL_MODULES + STOP_MODULES || (body.len() - STOP_MODULES) % SYMBOL_MODULES != 0 {
        return Err(DecodeError::BadLength(body.len()));
    }
    let (symbols, stop) = body.split_at(body.len() - STOP_MODULES);
    if pattern_of(stop).as_deref() != Some(PATTERNS[STOP as usize]) {
        return Err(DecodeError::MissingStop);
    }

    let mut codes = Vec::with_capacity(symbols.len() / SYMBOL_MODULES);
    for (n, chunk) in symbols.chunks(SYMBOL_MODULES).enumerate() {
        let widths = pattern_of(chunk).ok_or(DecodeError::BadPattern(n))?;
        let code = PATTERNS[..STOP as usize]
            .iter()
            .position(|p| *p == widths)
            .ok_or(DecodeError::BadPattern(n))?;
        codes.push(code as u8);
    }

    let (data, check) = codes.split_at(codes.len() - 1);
    let expected = checksum(data);
    if expected != check[0] {
        return Err(DecodeError::Checksum { expected, found: check[0] });
    }

    let mut set = match data[0] {
        START_A => CodeSet::A,
        START_B => CodeSet::B,
        START_C => CodeSet::C,
        _ => return Err(DecodeError::MissingStart),
    };

    let mut out = String::new();
    for &code in &data[1..] {
        match (set, code) {
            (CodeSet::C, 0..=99) => {
                out.push(char::from(b'0' + code / 10));
                out.push(char::from(b'0' + code % 10));
            }
            (CodeSet::A | CodeSet::B, TO_C) => set = CodeSet::C,
            (CodeSet::A | CodeSet::C, TO_B) => set = CodeSet::B,
            (CodeSet::B | CodeSet::C, TO_A) => set = CodeSet::A,
            (CodeSet::A, 0..=63) => out.push(char::from(code + 32)),
            (CodeSet::A, 64..=95) => out.push(char::from(code - 64)),
            (CodeSet::B, 0..=95) => out.push(char::from(code + 32)),
            _ => return Err(DecodeError::UnsupportedFunction(code)),
        }
    }
    Ok(out)
}

/// Read the symbol crossing pixel row `y` of a rendered barcode by sampling
/// module centres.
pub fn decode_row(img: &GrayImage, y: u32, module_px: u32) -> Result<String, DecodeError> {
    let dark = |x: u32| img.get_pixel(x, y).0[0] < 128;
    let start = (0..img.width()).find(|&x| dark(x)).ok_or(DecodeError::NoSymbol)?;
    let end = (0..img.width()).rev().find(|&x| dark(x)).ok_or(DecodeError::NoSymbol)?;

    let step = module_px.max(1);
    let count = (end - start + 1) / step;
    let modules: Vec<bool> = (0..count).map(|k| dark(start + k * step + step / 2)).collect();
    decode(&modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_is_consistent() {
        for (i, p) in PATTERNS.iter().enumerate() {
            let total: u32 = p.bytes().map(|b| (b - b'0') as u32).sum();
            let expect = if i == STOP as usize { 13 } else { 11 };
            assert_eq!(total, expect, "pattern {i}");
        }
        let mut sorted = PATTERNS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), PATTERNS.len());
    }

    #[test]
    fn text_uses_code_b() {
        let sym = encode("PJJ123C").unwrap();
        assert_eq!(sym.codes(), &[104, 48, 42, 42, 17, 18, 19, 35, 55, 106]);
    }

    #[test]
    fn digits_use_code_c() {
        let sym = encode("123456").unwrap();
        assert_eq!(sym.codes(), &[105, 12, 34, 56, 44, 106]);
        // odd run: one digit in B, then switch
        let sym = encode("12345").unwrap();
        assert_eq!(sym.codes()[..4], [104, 17, 99, 23]);
    }

    #[test]
    fn short_id_stays_in_b() {
        let sym = encode("123").unwrap();
        assert_eq!(sym.codes(), &[104, 17, 18, 19, 8, 106]);
    }

    #[test]
    fn control_chars_switch_to_a() {
        let sym = encode("AB\tC").unwrap();
        assert_eq!(sym.codes()[..5], [104, 33, 34, 101, 73]);
        assert_eq!(decode(&sym.modules()).unwrap(), "AB\tC");
    }

    #[test]
    fn rejects_empty_and_non_ascii() {
        assert_eq!(encode(""), Err(EncodingError::Empty));
        assert_eq!(
            encode("SKU-ü1"),
            Err(EncodingError::UnsupportedChar { ch: 'ü', position: 4 })
        );
    }

    #[test]
    fn module_count_matches_modules() {
        let sym = encode("ABC-123").unwrap();
        assert_eq!(sym.modules().len(), sym.module_count());
        assert!(sym.modules()[0]);
    }

    #[test]
    fn round_trips_through_modules() {
        for v in ["123", "ABC-123", "0042", "sku 991/b", "1234567890", "x12345y", "~DEL\u{7f}", "\u{1}\u{2}ab"] {
            let mut modules = vec![false; 10];
            modules.extend(encode(v).unwrap().modules());
            modules.extend(vec![false; 10]);
            assert_eq!(decode(&modules).unwrap(), v);
        }
    }

    #[test]
    fn decode_catches_corruption() {
        let mut modules = encode("HELLO").unwrap().modules();
        // swap a data symbol for another valid one so only the checksum breaks
        let other = encode("JELLO").unwrap().modules();
        modules[11..22].copy_from_slice(&other[11..22]);
        assert!(matches!(decode(&modules), Err(DecodeError::Checksum { .. })));
        assert_eq!(decode(&[false; 20]), Err(DecodeError::NoSymbol));
    }
}
