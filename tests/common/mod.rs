//! A minimal sixel interpreter for checking encoder output.
//!
//! It understands exactly the subset the encoder writes and panics on anything
//! else, so unexpected output fails the test that produced it.

use std::collections::HashMap;

use ff2sixel::Color;

#[derive(Debug, Default)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    /// Color each pixel was last drawn with.
    pub pixels: Vec<Option<Color>>,
    /// How many times each pixel was drawn.
    pub draws: Vec<u32>,
    pub introductions: usize,
    pub carriage_returns: usize,
    pub bands: usize,
    /// Counts of every `!<n>` repeat introducer seen.
    pub repeats: Vec<usize>,
}

struct Cursor<'s> {
    bytes: &'s [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, literal: &[u8]) {
        let end = self.pos + literal.len();
        assert_eq!(
            &self.bytes[self.pos..end],
            literal,
            "unexpected bytes at offset {}",
            self.pos
        );
        self.pos = end;
    }

    fn number(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        assert!(self.pos > start, "expected a number at offset {start}");
        std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap()
            .parse()
            .unwrap()
    }
}

pub fn interpret(stream: &[u8]) -> Canvas {
    let mut cursor = Cursor {
        bytes: stream,
        pos: 0,
    };

    cursor.expect(b"\x1bPq\"1;1;");
    let width = cursor.number();
    cursor.expect(b";");
    let height = cursor.number();

    let mut canvas = Canvas {
        width,
        height,
        pixels: vec![None; width * height],
        draws: vec![0; width * height],
        ..Default::default()
    };

    let mut registers = HashMap::<usize, Color>::new();
    let mut selected = None;
    let mut x = 0;

    loop {
        let byte = cursor.next().expect("stream ended without terminator");
        match byte {
            0x1b => {
                cursor.expect(b"\\");
                break;
            }
            b'#' => {
                let register = cursor.number();
                if cursor.peek() == Some(b';') {
                    cursor.expect(b";2;");
                    let red = cursor.number();
                    cursor.expect(b";");
                    let green = cursor.number();
                    cursor.expect(b";");
                    let blue = cursor.number();
                    assert!(red <= 100 && green <= 100 && blue <= 100);
                    registers.insert(
                        register,
                        Color::new(red as u8, green as u8, blue as u8),
                    );
                    canvas.introductions += 1;
                }
                selected = Some(register);
            }
            b'!' => {
                let count = cursor.number();
                canvas.repeats.push(count);
                let sixel = cursor.next().expect("repeat without sixel");
                for _ in 0..count {
                    draw(&mut canvas, &registers, selected, x, sixel);
                    x += 1;
                }
            }
            b'$' => {
                canvas.carriage_returns += 1;
                x = 0;
            }
            b'-' => {
                canvas.bands += 1;
                x = 0;
            }
            b'?'..=b'~' => {
                draw(&mut canvas, &registers, selected, x, byte);
                x += 1;
            }
            other => panic!("unexpected byte {other:#04x}"),
        }
    }

    assert_eq!(cursor.pos, stream.len(), "trailing bytes after terminator");
    canvas
}

fn draw(
    canvas: &mut Canvas,
    registers: &HashMap<usize, Color>,
    selected: Option<usize>,
    x: usize,
    sixel: u8,
) {
    assert!((b'?'..=b'~').contains(&sixel), "not a sixel: {sixel:#04x}");
    let bits = sixel - b'?';
    if bits == 0 {
        return;
    }

    let register = selected.expect("drawing with no register selected");
    let color = *registers
        .get(&register)
        .expect("drawing with an undefined register");

    assert!(x < canvas.width, "sixel past the right edge");
    for row in 0..6 {
        if bits & (1 << row) == 0 {
            continue;
        }
        let y = canvas.bands * 6 + row;
        assert!(y < canvas.height, "sixel below the bottom edge");
        let index = y * canvas.width + x;
        canvas.pixels[index] = Some(color);
        canvas.draws[index] += 1;
    }
}
