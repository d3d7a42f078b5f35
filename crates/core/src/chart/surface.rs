use std::fmt::Write;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    /// Dash and gap lengths; `None` draws a solid line
    pub dash: Option<(f64, f64)>,
    pub opacity: f64,
}

impl LineStyle {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
            opacity: 1.0,
        }
    }

    pub fn dashed(color: &str, width: f64, dash: (f64, f64), opacity: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some(dash),
            opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: String,
    pub size: f64,
    pub anchor: TextAnchor,
    /// Rotation in degrees around the text anchor point
    pub rotation: f64,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(color: &str, size: f64, anchor: TextAnchor) -> Self {
        Self {
            color: color.to_string(),
            size,
            anchor,
            rotation: 0.0,
            bold: false,
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Drawing backend the chart renderer paints onto.
///
/// The renderer only computes geometry; hosts supply a surface (SVG
/// document, canvas, GPU layer) that turns these calls into pixels.
pub trait RenderSurface {
    fn begin_frame(&mut self, width: f64, height: f64);
    /// Restrict subsequent drawing to `rect` until `pop_clip`.
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);
    fn draw_polyline(&mut self, points: &[(f64, f64)], style: &LineStyle);
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle);
    fn fill_rect(&mut self, rect: Rect, color: &str, opacity: f64);
    fn draw_text(&mut self, at: (f64, f64), text: &str, style: &TextStyle);
    fn end_frame(&mut self);
}

/// Renders into a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgSurface {
    buf: String,
    clip_count: usize,
    open_clips: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The SVG document produced so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn stroke_attrs(style: &LineStyle) -> String {
        let mut attrs = format!(
            r#"fill="none" stroke="{}" stroke-width="{}""#,
            escape_xml(&style.color),
            style.width
        );
        if let Some((dash, gap)) = style.dash {
            let _ = write!(attrs, r#" stroke-dasharray="{dash},{gap}""#);
        }
        if style.opacity < 1.0 {
            let _ = write!(attrs, r#" opacity="{}""#, style.opacity);
        }
        attrs
    }
}

impl RenderSurface for SvgSurface {
    fn begin_frame(&mut self, width: f64, height: f64) {
        self.buf.clear();
        self.clip_count = 0;
        self.open_clips = 0;
        let _ = writeln!(
            self.buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
        );
        let _ = writeln!(
            self.buf,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="white"/>"#
        );
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_count += 1;
        self.open_clips += 1;
        let id = format!("clip{}", self.clip_count);
        let _ = writeln!(
            self.buf,
            r#"<defs><clipPath id="{id}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
            rect.x, rect.y, rect.width, rect.height
        );
        let _ = writeln!(self.buf, r#"<g clip-path="url(#{id})">"#);
    }

    fn pop_clip(&mut self) {
        if self.open_clips > 0 {
            self.open_clips -= 1;
            self.buf.push_str("</g>\n");
        }
    }

    fn draw_polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        let mut d = String::with_capacity(points.len() * 16);
        for (i, (x, y)) in points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{x:.2},{y:.2}");
        }
        let _ = writeln!(
            self.buf,
            r#"<path d="{d}" {}/>"#,
            Self::stroke_attrs(style)
        );
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) {
        let _ = writeln!(
            self.buf,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            Self::stroke_attrs(style)
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: &str, opacity: f64) {
        let _ = writeln!(
            self.buf,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{opacity}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            escape_xml(color)
        );
    }

    fn draw_text(&mut self, at: (f64, f64), text: &str, style: &TextStyle) {
        let anchor = match style.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let mut attrs = format!(
            r#"x="{:.2}" y="{:.2}" fill="{}" font-size="{}" text-anchor="{anchor}""#,
            at.0,
            at.1,
            escape_xml(&style.color),
            style.size
        );
        if style.rotation != 0.0 {
            let _ = write!(
                attrs,
                r#" transform="rotate({} {:.2} {:.2})""#,
                style.rotation, at.0, at.1
            );
        }
        if style.bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        let _ = writeln!(self.buf, "<text {attrs}>{}</text>", escape_xml(text));
    }

    fn end_frame(&mut self) {
        while self.open_clips > 0 {
            self.pop_clip();
        }
        self.buf.push_str("</svg>\n");
    }
}

/// Escape the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
