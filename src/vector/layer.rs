use geo_types::Geometry;

/// Ordered river geometries, in the same coordinate reference as the elevation raster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiverLayer {
    geometries: Vec<Geometry<f64>>,
}

impl RiverLayer {
    pub fn new(geometries: Vec<Geometry<f64>>) -> Self {
        Self { geometries }
    }

    pub fn geometries(&self) -> &[Geometry<f64>] {
        &self.geometries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Geometry<f64>> {
        self.geometries.iter()
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

impl FromIterator<Geometry<f64>> for RiverLayer {
    fn from_iter<I: IntoIterator<Item = Geometry<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
