//! Synthetic GRIB2 message builder.
//!
//! Produces small but structurally complete GRIB2 messages: identification,
//! a regular lat/lon grid (template 3.0), an analysis/forecast product
//! (template 4.0) and simple packing (template 5.0) at 16 bits per value.
//! Non-finite input values are written as missing points through a bitmap.
//!
//! Signed GRIB2 integers use sign-and-magnitude encoding, not two's
//! complement.

/// Build a minimal GRIB2 message with the specified parameters
#[derive(Debug, Clone)]
pub struct Grib2Builder {
    discipline: u8,
    centre: u16,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    // Grid definition
    ni: u32,
    nj: u32,
    la1: i32, // microdegrees
    lo1: i32,
    di: u32,
    dj: u32,
    scanning_mode: u8,
    // Product definition
    param_category: u8,
    param_number: u8,
    level_type: u8,
    level_scale: i8,
    level_value: u32,
    forecast_hour: u32,
    values: Vec<f32>,
}

impl Default for Grib2Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Grib2Builder {
    /// 4x3 2 m temperature field from NCEP, rows north to south.
    pub fn new() -> Self {
        let (ni, nj) = (4, 3);
        Self {
            discipline: 0,
            centre: 7,
            year: 2024,
            month: 3,
            day: 15,
            hour: 6,
            ni,
            nj,
            la1: 45_000_000,
            lo1: 230_000_000,
            di: 1_000_000,
            dj: 1_000_000,
            scanning_mode: 0,
            param_category: 0,
            param_number: 0,
            level_type: 103,
            level_scale: 0,
            level_value: 2,
            forecast_hour: 0,
            values: ramp(ni * nj, 270.0, 310.0),
        }
    }

    pub fn with_discipline(mut self, discipline: u8) -> Self {
        self.discipline = discipline;
        self
    }

    pub fn with_centre(mut self, centre: u16) -> Self {
        self.centre = centre;
        self
    }

    pub fn with_reference_time(mut self, year: u16, month: u8, day: u8, hour: u8) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self
    }

    /// Resize the grid; values are reset to a 0..100 ramp.
    pub fn with_grid(mut self, ni: u32, nj: u32) -> Self {
        self.ni = ni;
        self.nj = nj;
        self.values = ramp(ni * nj, 0.0, 100.0);
        self
    }

    pub fn with_parameter(mut self, category: u8, number: u8) -> Self {
        self.param_category = category;
        self.param_number = number;
        self
    }

    pub fn with_level(mut self, level_type: u8, level_value: u32) -> Self {
        self.level_type = level_type;
        self.level_scale = 0;
        self.level_value = level_value;
        self
    }

    /// Level stored as `value * 10^-scale`.
    pub fn with_scaled_level(mut self, level_type: u8, scale: i8, value: u32) -> Self {
        self.level_type = level_type;
        self.level_scale = scale;
        self.level_value = value;
        self
    }

    pub fn with_forecast_hour(mut self, hour: u32) -> Self {
        self.forecast_hour = hour;
        self
    }

    pub fn with_scanning_mode(mut self, scanning_mode: u8) -> Self {
        self.scanning_mode = scanning_mode;
        self
    }

    pub fn with_gradient(mut self, min_val: f32, max_val: f32) -> Self {
        self.values = ramp(self.ni * self.nj, min_val, max_val);
        self
    }

    /// Raw values, row-major. NaN marks a missing point.
    pub fn with_values(mut self, values: Vec<f32>) -> Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Build the complete GRIB2 message bytes
    pub fn build(&self) -> Vec<u8> {
        let fields = [self.product_sections()];
        self.assemble(&fields)
    }

    /// One message holding a product per builder, all sharing the
    /// identification and grid of `self`.
    pub fn build_with_submessages(&self, others: &[Grib2Builder]) -> Vec<u8> {
        let mut fields = vec![self.product_sections()];
        fields.extend(others.iter().map(Grib2Builder::product_sections));
        self.assemble(&fields)
    }

    fn assemble(&self, products: &[Vec<u8>]) -> Vec<u8> {
        let section1 = self.build_section1();
        let section3 = self.build_section3();

        let message_length =
            16 + section1.len() + section3.len() + products.iter().map(Vec::len).sum::<usize>() + 4;

        let mut message = Vec::with_capacity(message_length);
        // Section 0: Indicator
        message.extend_from_slice(b"GRIB");
        message.extend_from_slice(&[0, 0]);
        message.push(self.discipline);
        message.push(2);
        message.extend_from_slice(&(message_length as u64).to_be_bytes());

        message.extend_from_slice(&section1);
        message.extend_from_slice(&section3);
        for product in products {
            message.extend_from_slice(product);
        }

        // Section 8: End
        message.extend_from_slice(b"7777");
        message
    }

    /// Sections 4 to 7 for this builder's field.
    fn product_sections(&self) -> Vec<u8> {
        let packing = Packing::new(&self.values);
        let mut sections = self.build_section4();
        sections.extend(packing.section5());
        sections.extend(packing.section6(&self.values));
        sections.extend(packing.section7(&self.values));
        sections
    }

    fn build_section1(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(21);
        section.extend_from_slice(&21u32.to_be_bytes());
        section.push(1);

        section.extend_from_slice(&self.centre.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Sub-centre
        section.push(2); // Master table version
        section.push(1); // Local table version
        section.push(1); // Significance of reference time (start of forecast)

        section.extend_from_slice(&self.year.to_be_bytes());
        section.push(self.month);
        section.push(self.day);
        section.push(self.hour);
        section.push(0); // Minute
        section.push(0); // Second

        section.push(0); // Production status (operational)
        section.push(1); // Type of data (forecast)
        section
    }

    fn build_section3(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(72);
        section.extend_from_slice(&72u32.to_be_bytes());
        section.push(3);

        section.push(0); // Source of grid definition
        section.extend_from_slice(&(self.ni * self.nj).to_be_bytes());
        section.push(0); // Octets for optional list
        section.push(0); // Interpretation of optional list
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 3.0

        section.push(6); // Shape of Earth (sphere, r = 6371229 m)
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());

        section.extend_from_slice(&self.ni.to_be_bytes());
        section.extend_from_slice(&self.nj.to_be_bytes());
        section.extend_from_slice(&0u32.to_be_bytes()); // Basic angle
        section.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes()); // Subdivisions

        let south_to_north = self.scanning_mode & 0b0100_0000 != 0;
        let lat_span = (self.nj.saturating_sub(1) * self.dj) as i32;
        let la2 = if south_to_north { self.la1 + lat_span } else { self.la1 - lat_span };
        let lo2 = self.lo1 + (self.ni.saturating_sub(1) * self.di) as i32;

        section.extend_from_slice(&sign_magnitude_i32(self.la1));
        section.extend_from_slice(&sign_magnitude_i32(self.lo1));
        section.push(48); // Resolution and component flags
        section.extend_from_slice(&sign_magnitude_i32(la2));
        section.extend_from_slice(&sign_magnitude_i32(lo2));
        section.extend_from_slice(&self.di.to_be_bytes());
        section.extend_from_slice(&self.dj.to_be_bytes());
        section.push(self.scanning_mode);
        section
    }

    fn build_section4(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(34);
        section.extend_from_slice(&34u32.to_be_bytes());
        section.push(4);

        section.extend_from_slice(&0u16.to_be_bytes()); // Number of coordinate values
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 4.0

        section.push(self.param_category);
        section.push(self.param_number);
        section.push(2); // Generating process (forecast)
        section.push(0); // Background process
        section.push(0); // Forecast process
        section.extend_from_slice(&0u16.to_be_bytes()); // Hours of cutoff
        section.push(0); // Minutes of cutoff
        section.push(1); // Time range unit (hours)
        section.extend_from_slice(&self.forecast_hour.to_be_bytes());

        section.push(self.level_type);
        section.push(sign_magnitude_i8(self.level_scale));
        section.extend_from_slice(&self.level_value.to_be_bytes());

        section.push(255); // Second fixed surface (none)
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section
    }
}

/// Simple-packing parameters for one field.
struct Packing {
    reference: f32,
    binary_scale: i16,
    bits_per_value: u8,
    present: u32,
    has_missing: bool,
}

impl Packing {
    fn new(values: &[f32]) -> Self {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let present = values.iter().filter(|v| v.is_finite()).count() as u32;
        let (reference, range) = if present == 0 { (0.0, 0.0) } else { (min, max - min) };

        let (binary_scale, bits_per_value) = if range == 0.0 {
            (0, 0)
        } else {
            // value = R + X * 2^E with X < 2^16
            ((range / 65535.0).log2().ceil() as i16, 16)
        };

        Self {
            reference,
            binary_scale,
            bits_per_value,
            present,
            has_missing: present as usize != values.len(),
        }
    }

    fn section5(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(21);
        section.extend_from_slice(&21u32.to_be_bytes());
        section.push(5);

        section.extend_from_slice(&self.present.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 5.0
        section.extend_from_slice(&self.reference.to_be_bytes());
        section.extend_from_slice(&sign_magnitude_i16(self.binary_scale));
        section.extend_from_slice(&sign_magnitude_i16(0)); // Decimal scale factor
        section.push(self.bits_per_value);
        section.push(0); // Original field type (floating point)
        section
    }

    fn section6(&self, values: &[f32]) -> Vec<u8> {
        if !self.has_missing {
            let mut section = Vec::with_capacity(6);
            section.extend_from_slice(&6u32.to_be_bytes());
            section.push(6);
            section.push(255); // No bitmap
            return section;
        }

        let mut bitmap = vec![0u8; values.len().div_ceil(8)];
        for (i, value) in values.iter().enumerate() {
            if value.is_finite() {
                bitmap[i / 8] |= 0x80 >> (i % 8);
            }
        }

        let mut section = Vec::with_capacity(6 + bitmap.len());
        section.extend_from_slice(&((6 + bitmap.len()) as u32).to_be_bytes());
        section.push(6);
        section.push(0); // Bitmap follows
        section.extend_from_slice(&bitmap);
        section
    }

    fn section7(&self, values: &[f32]) -> Vec<u8> {
        let mut packed = Vec::new();
        if self.bits_per_value > 0 {
            let scale = 2f32.powi(i32::from(self.binary_scale));
            for value in values.iter().filter(|v| v.is_finite()) {
                let x = ((value - self.reference) / scale).round().clamp(0.0, 65535.0) as u16;
                packed.extend_from_slice(&x.to_be_bytes());
            }
        }

        let mut section = Vec::with_capacity(5 + packed.len());
        section.extend_from_slice(&((5 + packed.len()) as u32).to_be_bytes());
        section.push(7);
        section.extend_from_slice(&packed);
        section
    }
}

fn ramp(n: u32, min: f32, max: f32) -> Vec<f32> {
    let n = n as usize;
    (0..n).map(|i| min + (max - min) * (i as f32 / n as f32)).collect()
}

fn sign_magnitude_i8(v: i8) -> u8 {
    if v < 0 {
        0x80 | v.unsigned_abs()
    } else {
        v as u8
    }
}

fn sign_magnitude_i16(v: i16) -> [u8; 2] {
    let raw = if v < 0 { 0x8000 | v.unsigned_abs() } else { v as u16 };
    raw.to_be_bytes()
}

fn sign_magnitude_i32(v: i32) -> [u8; 4] {
    let raw = if v < 0 { 0x8000_0000 | v.unsigned_abs() } else { v as u32 };
    raw.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_envelope() {
        let data = Grib2Builder::new().build();

        assert_eq!(&data[0..4], b"GRIB");
        assert_eq!(data[6], 0); // Discipline
        assert_eq!(data[7], 2); // Edition
        let length = u64::from_be_bytes(data[8..16].try_into().unwrap());
        assert_eq!(length as usize, data.len());
        assert_eq!(&data[data.len() - 4..], b"7777");
    }

    #[test]
    fn test_section_lengths() {
        let data = Grib2Builder::new().with_grid(10, 10).build();
        // 16 + 21 + 72 + 34 + 21 + 6 + (5 + 200) + 4
        assert_eq!(data.len(), 379);
    }

    #[test]
    fn test_missing_values_use_bitmap() {
        let mut values = vec![1.0f32; 10];
        values[3] = f32::NAN;
        let data = Grib2Builder::new().with_grid(10, 1).with_values(values).build();

        // Section 6 starts after 16 + 21 + 72 + 34 + 21
        let s6 = 16 + 21 + 72 + 34 + 21;
        assert_eq!(data[s6 + 4], 6);
        assert_eq!(data[s6 + 5], 0);
        assert_eq!(data[s6 + 6], 0b1110_1111);
        assert_eq!(data[s6 + 7], 0b1100_0000);
    }

    #[test]
    fn test_submessages_share_grid() {
        let base = Grib2Builder::new();
        let single = base.build();
        let multi = base.build_with_submessages(&[base.clone().with_parameter(1, 1)]);
        assert_eq!(multi.len(), single.len() + (34 + 21 + 6 + 5 + 2 * 12));
    }

    #[test]
    fn test_sign_magnitude() {
        assert_eq!(sign_magnitude_i16(-10), [0x80, 0x0A]);
        assert_eq!(sign_magnitude_i16(3), [0x00, 0x03]);
        assert_eq!(sign_magnitude_i8(-2), 0x82);
        assert_eq!(sign_magnitude_i32(-1), [0x80, 0, 0, 1]);
    }
}
