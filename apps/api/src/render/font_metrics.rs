//! Static Times-Roman width table used to wrap text before it is drawn.
//!
//! Widths are in em units (AFM widths / 1000). The table covers ASCII 0x20..=0x7E;
//! Latin-1 characters above that fall back to `average_char_width`, which is close
//! enough for a greedy wrap.

/// Page geometry for the exported PDF, in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance.
    pub line_height_pt: f32,
}

impl PageConfig {
    /// Usable text width expressed in em units at the configured font size.
    pub fn text_width_em(&self) -> f32 {
        (self.width_pt - 2.0 * self.margin_pt) / self.font_size_pt
    }

    /// Number of lines that fit between the top and bottom margins.
    pub fn max_lines(&self) -> usize {
        let usable = self.height_pt - 2.0 * self.margin_pt;
        (usable / self.line_height_pt).floor().max(0.0) as usize + 1
    }
}

/// US letter, 40pt margins, Times-Roman 12pt on a 14pt line.
pub const RESUME_PAGE: PageConfig = PageConfig {
    width_pt: 612.0,
    height_pt: 792.0,
    margin_pt: 40.0,
    font_size_pt: 12.0,
    line_height_pt: 14.0,
};

/// `widths[i]` = width of ASCII character `(i + 32)`.
pub struct FontMetricTable {
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }
}

pub static TIMES_ROMAN: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.500,
    space_width: 0.250,
};
