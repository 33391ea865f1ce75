// writes the grown skeleton as an obj polyline file
// one vertex per claimed node, one line element per segment,
// grouped by generation so each iteration can be styled on its own

use skeleton_core::{Skeleton, types::NodeId};
use std::collections::HashMap;
use std::io::{self, Write};

pub fn write_obj(skeleton: &Skeleton, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "# tree skeleton")?;
    writeln!(
        writer,
        "# {} nodes, {} segments, {} generations",
        skeleton.nodes.len(),
        skeleton.segments.len(),
        skeleton.generations()
    )?;

    // OBJ indices start at 1
    let mut index: HashMap<NodeId, usize> = HashMap::with_capacity(skeleton.nodes.len());
    for (i, node) in skeleton.nodes.iter().enumerate() {
        let p = node.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        index.insert(node.id, i + 1);
    }

    for generation in 1..=skeleton.generations() {
        let mut segments = skeleton.segments_of(generation).peekable();
        if segments.peek().is_none() {
            continue;
        }
        writeln!(writer, "g generation_{generation}")?;
        for s in segments {
            // both ends are claimed, so both have a vertex
            if let (Some(a), Some(b)) = (index.get(&s.child), index.get(&s.parent)) {
                writeln!(writer, "l {a} {b}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skeleton_core::skeleton::{StemNode, StemSegment};

    fn two_generation_skeleton() -> Skeleton {
        let node = |id, position, parent, generation| StemNode {
            id,
            position,
            parent,
            generation,
            guide: Vec3::Y,
        };
        let nodes = vec![
            node(10, Vec3::ZERO, None, 1),
            node(11, Vec3::Y, Some(10), 1),
            node(4, Vec3::new(1.0, 1.0, 0.0), Some(11), 2),
        ];
        let segments = vec![
            StemSegment {
                child: 11,
                parent: 10,
                generation: 1,
                from: Vec3::Y,
                to: Vec3::ZERO,
            },
            StemSegment {
                child: 4,
                parent: 11,
                generation: 2,
                from: Vec3::new(1.0, 1.0, 0.0),
                to: Vec3::Y,
            },
        ];
        Skeleton {
            root: Some(10),
            nodes,
            segments,
        }
    }

    #[test]
    fn obj_has_vertices_and_grouped_lines() {
        let mut out = Vec::new();
        write_obj(&two_generation_skeleton(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();

        assert_eq!(
            lines,
            vec![
                "v 0 0 0",
                "v 0 1 0",
                "v 1 1 0",
                "g generation_1",
                "l 2 1",
                "g generation_2",
                "l 3 2",
            ]
        );
    }

    #[test]
    fn empty_skeleton_writes_only_the_header() {
        let mut out = Vec::new();
        write_obj(&Skeleton::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.lines().all(|l| l.starts_with('#')));
    }
}
