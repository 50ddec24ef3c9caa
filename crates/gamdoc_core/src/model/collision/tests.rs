use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::collision::{Collider, ColliderShape, ConvexMesh, HierGeom, dump_colliders, dump_hier_geoms, load_colliders, load_hier_geoms};
use crate::model::{Game, ModelError};

fn sphere() -> Collider {
	Collider {
		kind: ColliderShape::Sphere as u32,
		location: [1.0, 2.0, 3.0],
		size: [0.5; 3],
		gametype: 7,
		..Collider::default()
	}
}

#[test]
fn collider_size_depends_on_game() {
	for game in [Game::Hta, Game::Clans] {
		let mut writer = ByteWriter::new();
		sphere().dump(&mut writer, game);
		assert_eq!(writer.len(), Collider::size_for(game));
	}
}

#[test]
fn gametype_only_survives_clans_build() {
	let mut writer = ByteWriter::new();
	dump_colliders(&mut writer, Game::Clans, &[sphere()]).expect("encodes");
	let decoded = load_colliders(&mut Cursor::new(writer.as_slice()), Game::Clans).expect("decodes");
	assert_eq!(decoded, vec![sphere()]);

	let mut writer = ByteWriter::new();
	dump_colliders(&mut writer, Game::Hta, &[sphere()]).expect("encodes");
	let decoded = load_colliders(&mut Cursor::new(writer.as_slice()), Game::Hta).expect("decodes");
	assert_eq!(decoded[0].gametype, 0);
	assert_eq!(decoded[0].shape(), Some(ColliderShape::Sphere));
}

#[test]
fn hier_geom_appends_bone() {
	let items = vec![HierGeom { collider: sphere(), bone: 4 }];
	let mut writer = ByteWriter::new();
	dump_hier_geoms(&mut writer, Game::Clans, &items).expect("encodes");
	assert_eq!(writer.len(), 4 + 48 + 4);
	assert_eq!(load_hier_geoms(&mut Cursor::new(writer.as_slice()), Game::Clans).expect("decodes"), items);
}

#[test]
fn unknown_shape_is_preserved() {
	let odd = Collider { kind: 9, ..Collider::default() };
	assert_eq!(odd.shape(), None);
	assert_eq!(ColliderShape::from_kind(2), Some(ColliderShape::Cylinder));
	assert_eq!(ColliderShape::Box.as_str(), "box");
}

#[test]
fn convex_hull_stores_counts_then_arrays() {
	let hull = ConvexMesh {
		vertices: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
		indices: vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]],
	};
	let mut writer = ByteWriter::new();
	hull.dump(&mut writer).expect("encodes");
	assert_eq!(writer.len(), 8 + 4 * 12 + 4 * 6);
	assert_eq!(&writer.as_slice()[..8], &[4, 0, 0, 0, 4, 0, 0, 0]);
	assert_eq!(ConvexMesh::load(&mut Cursor::new(writer.as_slice())).expect("decodes"), hull);
}

#[test]
fn convex_hull_checks_corners() {
	let hull = ConvexMesh {
		vertices: vec![[0.0; 3]; 2],
		indices: vec![[0, 1, 2]],
	};
	assert!(matches!(hull.dump(&mut ByteWriter::new()), Err(ModelError::IndexOutOfRange { index: 2, len: 2, .. })));
}
