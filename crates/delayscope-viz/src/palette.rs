use plotters::style::RGBColor;

/// Ten-colour qualitative palette, cycled for series and groups.
const SERIES: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
    RGBColor(255, 127, 14),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub(crate) const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

pub(crate) fn series(index: usize) -> RGBColor {
    SERIES[index % SERIES.len()]
}
