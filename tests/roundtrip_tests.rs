//! End-to-end tests through the public API
//!
//! Every symbol produced by an encoder is read back by the matching
//! decoder. Random payloads and corruption use a seeded `StdRng` so
//! failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_matrix::common::BitBuffer;
use rust_matrix::ecc::{GaloisField, ReedSolomonDecoder, ReedSolomonEncoder};
use rust_matrix::qr::modes::NumericEncoder;
use rust_matrix::{
    CodecError, DataMatrixOptions, ECLevel, Encodation, Mode, ModeRun, QrEncodeOptions, Segment,
    SymbolShape, Version, decode_datamatrix, decode_qr, encode_datamatrix,
    encode_datamatrix_bytes, encode_qr, encode_qr_bytes, encode_qr_segments,
};

const ALPHABETS: [&str; 6] = [
    "0123456789",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 $%*+-./:",
    "abcdefghijklmnopqrstuvwxyz ,.!?",
    "AIM>*\r0123456789 ",
    "caf\u{e9} na\u{ef}ve \u{c5}ngstr\u{f6}m",
    "\u{20ac}\u{65e5}\u{672c} \u{1F918}abc",
];

fn random_text(rng: &mut StdRng, max_len: usize) -> String {
    let alphabet: Vec<char> = ALPHABETS[rng.random_range(0..ALPHABETS.len())]
        .chars()
        .collect();
    let len = rng.random_range(1..=max_len);
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

fn random_bytes(rng: &mut StdRng, max_len: usize) -> Vec<u8> {
    let len = rng.random_range(1..=max_len);
    (0..len).map(|_| rng.random()).collect()
}

#[test]
fn test_qr_text_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5152);
    for _ in 0..60 {
        let text = random_text(&mut rng, 120);
        let ec_level = ECLevel::ALL[rng.random_range(0..4)];
        let options = QrEncodeOptions::default().with_ec_level(ec_level);
        let code = encode_qr(&text, &options).unwrap();
        let decoded = decode_qr(&code.modules).unwrap();
        assert_eq!(decoded.content, text);
        assert_eq!(decoded.version, code.version);
        assert_eq!(decoded.error_correction, ec_level);
        assert_eq!(decoded.mask_pattern, code.mask_pattern);
    }
}

#[test]
fn test_qr_bytes_roundtrip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..40 {
        let data = random_bytes(&mut rng, 200);
        let code = encode_qr_bytes(&data, &QrEncodeOptions::default()).unwrap();
        let decoded = decode_qr(&code.modules).unwrap();
        assert_eq!(decoded.data, data);
    }
}

#[test]
fn test_qr_every_version_and_level() {
    for number in 1..=40 {
        let version = Version::new(number).unwrap();
        for ec_level in ECLevel::ALL {
            let options = QrEncodeOptions::default()
                .with_ec_level(ec_level)
                .with_version(version);
            let code = encode_qr("QR 40", &options).unwrap();
            assert_eq!(code.modules.width(), version.size());
            let decoded = decode_qr(&code.modules).unwrap();
            assert_eq!(decoded.content, "QR 40");
            assert_eq!(decoded.version, version);
            assert_eq!(decoded.error_correction, ec_level);
        }
    }
}

#[test]
fn test_datamatrix_text_roundtrip() {
    let mut rng = StdRng::seed_from_u64(200);
    for _ in 0..150 {
        let text = random_text(&mut rng, 90);
        let shape = [SymbolShape::None, SymbolShape::Square, SymbolShape::Rectangle]
            [rng.random_range(0..3)];
        let options = DataMatrixOptions::default().with_shape(shape).with_eci(true);
        let code = match encode_datamatrix(&text, &options) {
            Ok(code) => code,
            // Long payloads do not fit the largest rectangle
            Err(CodecError::CapacityExceeded { .. }) if shape == SymbolShape::Rectangle => continue,
            Err(err) => panic!("{:?} failed: {}", text, err),
        };
        let decoded = decode_datamatrix(&code.modules).unwrap();
        assert_eq!(decoded.content, text);
        assert_eq!(decoded.codewords, code.codewords);
        assert_eq!((decoded.width, decoded.height), (code.width, code.height));
    }
}

#[test]
fn test_datamatrix_text_charset() {
    let options = DataMatrixOptions::default();
    assert_eq!(
        encode_datamatrix("1\u{65e5}", &options).unwrap_err(),
        CodecError::IllegalCharacter { ch: '\u{65e5}', position: 1 }
    );

    let code = encode_datamatrix("1\u{65e5}", &options.with_eci(true)).unwrap();
    let decoded = decode_datamatrix(&code.modules).unwrap();
    assert_eq!(decoded.content, "1\u{65e5}");
}

#[test]
fn test_qr_kanji_segment_roundtrip() {
    // Shift_JIS for the two characters of "nihon"
    let segments = [Segment::Kanji(vec![0x93, 0xFA, 0x96, 0x7B])];
    let code = encode_qr_segments(&segments, &QrEncodeOptions::default()).unwrap();
    assert_eq!(code.content, "\u{65e5}\u{672c}");
    let decoded = decode_qr(&code.modules).unwrap();
    assert_eq!(decoded.content, "\u{65e5}\u{672c}");
    assert_eq!(decoded.segments, vec![ModeRun::new(Mode::Kanji, 2)]);
}

#[test]
fn test_datamatrix_bytes_roundtrip() {
    let mut rng = StdRng::seed_from_u64(201);
    for _ in 0..80 {
        let data = random_bytes(&mut rng, 300);
        let code = encode_datamatrix_bytes(&data, &DataMatrixOptions::default()).unwrap();
        let decoded = decode_datamatrix(&code.modules).unwrap();
        assert_eq!(decoded.data, data);
    }
}

#[test]
fn test_datamatrix_every_size() {
    let sizes = [(10, 10), (18, 8), (32, 8), (36, 16), (64, 64), (120, 120), (144, 144)];
    for (width, height) in sizes {
        let options = DataMatrixOptions::default()
            .with_min_size(width, height)
            .with_max_size(width, height);
        let code = encode_datamatrix("Size 42 / ok", &options);
        let code = match (width, height) {
            (10, 10) | (18, 8) => {
                // Ten codewords needed, three or five available
                assert!(matches!(code, Err(CodecError::CapacityExceeded { .. })));
                continue;
            }
            _ => code.unwrap(),
        };
        assert_eq!((code.width, code.height), (width, height));
        let decoded = decode_datamatrix(&code.modules).unwrap();
        assert_eq!(decoded.content, "Size 42 / ok");
    }
}

#[test]
fn test_symbol_damage_is_repaired() {
    let mut rng = StdRng::seed_from_u64(99);

    let options = QrEncodeOptions::default().with_ec_level(ECLevel::H);
    let code = encode_qr("REPAIR ME 0123456789", &options).unwrap();
    let mut damaged = code.modules.clone();
    // A short burst inside the data area near the bottom right
    let size = damaged.width();
    for (dx, dy) in [(1, 1), (2, 1), (1, 2), (3, 4)] {
        damaged.toggle(size - dx, size - dy);
    }
    let decoded = decode_qr(&damaged).unwrap();
    assert_eq!(decoded.content, "REPAIR ME 0123456789");
    assert!(decoded.corrected_errors > 0);

    let code = encode_datamatrix("Data Matrix keeps working", &DataMatrixOptions::default())
        .unwrap();
    let mut damaged = code.modules.clone();
    let (x, y) = (rng.random_range(2..code.width - 2), rng.random_range(2..code.height - 2));
    damaged.toggle(x, y);
    let decoded = decode_datamatrix(&damaged).unwrap();
    assert_eq!(decoded.content, "Data Matrix keeps working");
    assert!(decoded.corrected_errors <= 1);
}

#[test]
fn test_reed_solomon_within_and_beyond_capacity() {
    let mut rng = StdRng::seed_from_u64(0xEC);
    let field = GaloisField::qr_code();
    let encoder = ReedSolomonEncoder::new(field);
    let decoder = ReedSolomonDecoder::new(field);
    let ec_count = 10;

    for trial in 0..300 {
        let data = random_bytes(&mut rng, 40);
        let mut block = data.clone();
        block.extend(encoder.ec_codewords(&data, ec_count).unwrap());

        // Up to five errors always repair, six or more may not
        let errors = if trial % 2 == 0 {
            rng.random_range(1..=ec_count / 2)
        } else {
            rng.random_range(ec_count / 2 + 1..=ec_count)
        };
        let mut received = block.clone();
        let mut positions: Vec<usize> = (0..block.len()).collect();
        for _ in 0..errors {
            let position = positions.swap_remove(rng.random_range(0..positions.len()));
            received[position] ^= rng.random_range(1..=255u8);
        }

        match decoder.decode_bytes(&mut received, ec_count) {
            Ok(corrected) => {
                assert_eq!(received, block, "silent miscorrection with {} errors", errors);
                assert_eq!(corrected, errors);
            }
            Err(err) => {
                assert!(errors > ec_count / 2, "{} errors not repaired", errors);
                assert_eq!(err, CodecError::TooManyErrors);
            }
        }
    }
}

#[test]
fn test_reed_solomon_small_field() {
    let field = GaloisField::aztec_param();
    let encoder = ReedSolomonEncoder::new(field);
    let decoder = ReedSolomonDecoder::new(field);

    let mut block = [1u16, 2, 3, 4, 0, 0];
    encoder.encode(&mut block, 2).unwrap();
    for position in 0..block.len() {
        let mut received = block;
        received[position] ^= 0x9;
        assert_eq!(decoder.decode(&mut received, 2).unwrap(), 1);
        assert_eq!(received[..4], [1, 2, 3, 4]);
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let text = "Mixed 123 content / WITH CAPS and \u{e9}";
    let options = QrEncodeOptions::default();
    let first = encode_qr(text, &options).unwrap();
    let second = encode_qr(text, &options).unwrap();
    assert_eq!(first.modules, second.modules);
    assert_eq!(first.segments, second.segments);

    let options = DataMatrixOptions::default();
    let first = encode_datamatrix(text, &options).unwrap();
    let second = encode_datamatrix(text, &options).unwrap();
    assert_eq!(first.codewords, second.codewords);
    assert_eq!(first.segments, second.segments);
    assert_eq!(first.modules, second.modules);

    let encoder = ReedSolomonEncoder::data_matrix();
    assert_eq!(
        encoder.ec_codewords(&[142, 129, 70], 5).unwrap(),
        encoder.ec_codewords(&[142, 129, 70], 5).unwrap()
    );
}

#[test]
fn test_qr_capacity_boundary() {
    // 1-L holds 19 data codewords: 17 bytes after the byte mode header
    let options = QrEncodeOptions::default();
    let fits = encode_qr_bytes(&[b'a'; 17], &options).unwrap();
    assert_eq!(fits.version.number(), 1);
    let grows = encode_qr_bytes(&[b'a'; 18], &options).unwrap();
    assert_eq!(grows.version.number(), 2);

    let forced = options.with_version(Version::MIN);
    assert!(matches!(
        encode_qr_bytes(&[b'a'; 18], &forced),
        Err(CodecError::CapacityExceeded { .. })
    ));

    let largest = encode_qr_bytes(&vec![0x42; 2953], &options).unwrap();
    assert_eq!(largest.version, Version::MAX);
    assert!(matches!(
        encode_qr_bytes(&vec![0x42; 2954], &options),
        Err(CodecError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_datamatrix_capacity_boundary() {
    let options = DataMatrixOptions::default();
    // Three digit pairs fill the three data codewords of 10x10
    let exact = encode_datamatrix("123456", &options).unwrap();
    assert_eq!((exact.width, exact.height), (10, 10));
    let next = encode_datamatrix("1234567", &options).unwrap();
    assert_eq!((next.width, next.height), (12, 12));

    let capped = options.with_max_size(10, 10);
    assert!(matches!(
        encode_datamatrix("1234567", &capped),
        Err(CodecError::CapacityExceeded { needed: 4, available: 3 })
    ));

    let full = "9".repeat(3116);
    let largest = encode_datamatrix(&full, &options).unwrap();
    assert_eq!((largest.width, largest.height), (144, 144));
    assert_eq!(decode_datamatrix(&largest.modules).unwrap().content, full);
    assert!(matches!(
        encode_datamatrix(&"9".repeat(3117), &options),
        Err(CodecError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_numeric_scenario() {
    let mut bits = BitBuffer::new();
    NumericEncoder::encode("01234567", &mut bits).unwrap();
    assert_eq!(bits.len(), 10 + 10 + 7);

    let options = QrEncodeOptions::default().with_ec_level(ECLevel::L);
    let code = encode_qr("01234567", &options).unwrap();
    assert_eq!(code.segments, vec![ModeRun::new(Mode::Numeric, 8)]);
    let decoded = decode_qr(&code.modules).unwrap();
    assert_eq!(decoded.content, "01234567");
    assert_eq!(decoded.segments, vec![ModeRun::new(Mode::Numeric, 8)]);
}

#[test]
fn test_datamatrix_digit_pair_scenario() {
    let code = encode_datamatrix("12", &DataMatrixOptions::default()).unwrap();
    // Digit pair 12 plus 130
    assert_eq!(code.codewords[0], 142);
    assert_eq!(code.segments, vec![ModeRun::new(Encodation::Ascii, 2)]);
    let decoded = decode_datamatrix(&code.modules).unwrap();
    assert_eq!(decoded.content, "12");
}
