// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OBJ Line Classification
//!
//! A line is a vertex record when its first whitespace-delimited token is
//! exactly `v`. Everything else (`vn`, `vt`, faces, comments, blank lines)
//! is carried through untouched. Lines are handled as raw bytes so that
//! non-UTF-8 content in comments or groups survives unchanged.

use nalgebra::Point3;
use obj_georef_core::{parse_leading_reals, tokens};

/// One classified line of a mesh file
#[derive(Debug, Clone, PartialEq)]
pub enum MeshRecord<'a> {
    /// `v x y z [...]`; anything past the third coordinate is dropped
    Vertex {
        position: Point3<f64>,
        terminator: &'a [u8],
    },
    /// Vertex record with fewer than three numeric coordinates
    MalformedVertex { body: &'a [u8] },
    /// Any other line, terminator included
    Other(&'a [u8]),
}

impl<'a> MeshRecord<'a> {
    /// Classify one line as read from the file, terminator included
    pub fn classify(line: &'a [u8]) -> Self {
        let (body, terminator) = split_terminator(line);
        let mut fields = tokens(body);

        if fields.next() != Some(b"v".as_slice()) {
            return MeshRecord::Other(line);
        }

        match parse_leading_reals::<3>(fields) {
            Some([x, y, z]) => MeshRecord::Vertex {
                position: Point3::new(x, y, z),
                terminator,
            },
            None => MeshRecord::MalformedVertex { body },
        }
    }
}

/// Split a line into its body and its `\n` / `\r\n` terminator
///
/// The last line of a file may have no terminator at all.
pub fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let cut = if line.ends_with(b"\r\n") {
        line.len() - 2
    } else if line.ends_with(b"\n") {
        line.len() - 1
    } else {
        line.len()
    };
    line.split_at(cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_lines() {
        assert_eq!(
            MeshRecord::classify(b"v 1.0 2.0 3.0\n"),
            MeshRecord::Vertex {
                position: Point3::new(1.0, 2.0, 3.0),
                terminator: b"\n",
            }
        );

        // Colour channels after the position are ignored
        assert_eq!(
            MeshRecord::classify(b"  v\t-1 0.5e1 7 0.2 0.3 0.4\r\n"),
            MeshRecord::Vertex {
                position: Point3::new(-1.0, 5.0, 7.0),
                terminator: b"\r\n",
            }
        );

        assert_eq!(
            MeshRecord::classify(b"v 1 2 3"),
            MeshRecord::Vertex {
                position: Point3::new(1.0, 2.0, 3.0),
                terminator: b"",
            }
        );
    }

    #[test]
    fn test_other_lines_keep_their_bytes() {
        for line in [
            b"vn 0 0 1\n".as_slice(),
            b"vt 0.5 0.5\n",
            b"f 1 2 3\r\n",
            b"# v 1 2 3\n",
            b"\n",
            b"",
            b"g \xff\xfe group\n",
        ] {
            assert_eq!(MeshRecord::classify(line), MeshRecord::Other(line));
        }
    }

    #[test]
    fn test_malformed_vertices() {
        assert_eq!(
            MeshRecord::classify(b"v 1.0 2.0\n"),
            MeshRecord::MalformedVertex { body: b"v 1.0 2.0" }
        );
        assert_eq!(
            MeshRecord::classify(b"v 1.0 abc 3.0\n"),
            MeshRecord::MalformedVertex {
                body: b"v 1.0 abc 3.0"
            }
        );
        assert_eq!(
            MeshRecord::classify(b"v\n"),
            MeshRecord::MalformedVertex { body: b"v" }
        );
    }

    #[test]
    fn test_split_terminator() {
        assert_eq!(split_terminator(b"a\r\n"), (b"a".as_slice(), b"\r\n".as_slice()));
        assert_eq!(split_terminator(b"a\n"), (b"a".as_slice(), b"\n".as_slice()));
        assert_eq!(split_terminator(b"a"), (b"a".as_slice(), b"".as_slice()));
        assert_eq!(split_terminator(b"\r"), (b"\r".as_slice(), b"".as_slice()));
    }
}
