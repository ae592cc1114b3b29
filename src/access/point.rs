//! 3-D points stored as `<x/>`, `<y/>` and `<z/>` children

use super::value::Scalar;
use crate::error::{Error, Result};
use crate::path;
use crate::session::Session;

const COORDINATES: [&str; 3] = ["x", "y", "z"];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    fn coordinates(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Session {
    /// Write the coordinates below the element at `path`, creating the
    /// element under an existing parent when needed
    pub fn add_point(&mut self, path: &str, point: Point, format: Option<&str>) -> Result<()> {
        self.ensure_writable()?;
        self.create_element_if_not_exists(path)?;
        for (name, value) in COORDINATES.iter().zip(point.coordinates()) {
            self.save_element(&path::join(path, name), &value, format)?;
        }
        Ok(())
    }

    /// Read a point; every coordinate must be present
    pub fn get_point(&self, path: &str) -> Result<Point> {
        let [x, y, z] = self.point_coordinates(path)?;
        let missing = |c: Option<f64>, name: &str| {
            c.ok_or_else(|| Error::CoordinateNotFound {
                path: path.to_string(),
                coordinate: name.to_string(),
            })
        };
        Ok(Point::new(missing(x, "x")?, missing(y, "y")?, missing(z, "z")?))
    }

    /// Read a point, keeping the coordinates of `defaults` that are missing
    pub fn get_point_or(&self, path: &str, defaults: Point) -> Result<Point> {
        let [x, y, z] = self.point_coordinates(path)?;
        Ok(Point::new(
            x.unwrap_or(defaults.x),
            y.unwrap_or(defaults.y),
            z.unwrap_or(defaults.z),
        ))
    }

    fn point_coordinates(&self, path: &str) -> Result<[Option<f64>; 3]> {
        let id = self.resolve_element(path)?;
        let doc = self.document();
        let mut found = [None; 3];
        for (slot, name) in found.iter_mut().zip(COORDINATES) {
            if let Some(child) = doc.named_children(id, name).next() {
                *slot = Some(f64::from_text(&path::join(path, name), &doc.text(child))?);
            }
        }
        if found.iter().all(Option::is_none) {
            return Err(Error::NoPointFound(path.to_string()));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{write_subtree, Document};

    fn session(xml: &str) -> Session {
        Session::detached(Document::parse(xml).unwrap())
    }

    #[test]
    fn test_add_and_get_point() {
        let mut s = session("<r/>");
        s.add_point("/r/p", Point::new(1.0, -2.5, 0.0), None).unwrap();
        let root = s.document().root_element().unwrap();
        assert_eq!(
            write_subtree(s.document(), root, false),
            "<r><p><x>1</x><y>-2.5</y><z>0</z></p></r>"
        );
        assert_eq!(s.get_point("/r/p").unwrap(), Point::new(1.0, -2.5, 0.0));

        s.add_point("/r/p", Point::new(3.0, 3.0, 3.0), Some("%.1f")).unwrap();
        assert_eq!(s.get_text("/r/p/x").unwrap(), "3.0");
    }

    #[test]
    fn test_missing_coordinates() {
        let s = session("<r><p><x>1</x><z>2</z></p><q/></r>");
        assert_eq!(
            s.get_point("/r/p"),
            Err(Error::CoordinateNotFound {
                path: "/r/p".into(),
                coordinate: "y".into()
            })
        );
        assert_eq!(
            s.get_point_or("/r/p", Point::new(0.0, 7.0, 0.0)).unwrap(),
            Point::new(1.0, 7.0, 2.0)
        );
        assert_eq!(s.get_point("/r/q"), Err(Error::NoPointFound("/r/q".into())));
        assert!(matches!(s.get_point("/r/none"), Err(Error::ElementNotFound(_))));
    }
}
