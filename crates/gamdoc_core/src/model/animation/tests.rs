use crate::model::animation::{Animation, Change, Key, dump_animations, load_animations};
use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError};

fn key(node: i32, x: f32) -> Key {
	Key {
		node,
		location: [x, 0.0, 0.0],
		..Key::default()
	}
}

fn walk() -> Animation {
	Animation {
		name: "walk".to_owned(),
		fps: 30,
		next: -1,
		action: 0,
		changes: vec![Change { kind: 2, current: 1, new: 3 }],
		frames: vec![vec![key(0, 0.0), key(1, 0.0)], vec![key(0, 1.0), key(1, 1.0)], vec![key(0, 2.0), key(1, 2.0)]],
	}
}

fn round_trip(animation: &Animation, dialect: Dialect, node_count: usize) -> (usize, Animation) {
	let mut writer = ByteWriter::new();
	animation.dump(&mut writer, dialect, 0, node_count).expect("encodes");
	let mut cursor = Cursor::new(writer.as_slice());
	let decoded = Animation::load(&mut cursor, dialect, node_count).expect("decodes");
	assert_eq!(cursor.remaining(), 0);
	(writer.len(), decoded)
}

#[test]
fn gam_animation_layout() {
	let mut animation = walk();
	animation.action = 9;
	let (len, decoded) = round_trip(&animation, Dialect::Gam, 2);
	assert_eq!(len, 25 + 14 + 8 + 3 * 2 * 30);
	assert_eq!(decoded, animation);
}

#[test]
fn sam_animation_sizes_frames_by_node_count() {
	let mut animation = walk();
	for (idx, key) in animation.frames.iter_mut().flat_map(|frame| frame.iter_mut()).enumerate() {
		key.scale = [idx as f32; 3];
	}
	let (len, decoded) = round_trip(&animation, Dialect::Sam, 2);
	assert_eq!(len, 25 + 16 + 8 + 3 * 2 * 40);
	assert_eq!(decoded, animation);
}

#[test]
fn sam_key_node_is_positional() {
	let mut animation = walk();
	for frame in &mut animation.frames {
		frame.swap(0, 1);
	}
	let (_, decoded) = round_trip(&animation, Dialect::Sam, 2);
	assert_eq!(decoded.frames[0][0].node, 0);
	assert_eq!(decoded.frames[0][0].location, animation.frames[0][0].location);
}

#[test]
fn gam_defaults_key_scale() {
	let mut animation = walk();
	animation.frames[0][0].scale = [3.0; 3];
	let (_, decoded) = round_trip(&animation, Dialect::Gam, 2);
	assert_eq!(decoded.frames[0][0].scale, [1.0; 3]);
}

#[test]
fn ragged_frames_are_rejected() {
	let mut animation = walk();
	animation.frames[2].pop();
	let err = animation.dump(&mut ByteWriter::new(), Dialect::Gam, 4, 2).expect_err("ragged");
	assert!(matches!(
		err,
		ModelError::RaggedFrames {
			animation: 4,
			frame: 2,
			expected: 2,
			got: 1
		}
	));

	let err = walk().dump(&mut ByteWriter::new(), Dialect::Sam, 0, 3).expect_err("node count differs");
	assert!(matches!(err, ModelError::RaggedFrames { expected: 3, got: 2, .. }));
}

#[test]
fn gam_key_nodes_must_exist() {
	let err = walk().dump(&mut ByteWriter::new(), Dialect::Gam, 0, 1).expect_err("node 1 missing");
	assert!(matches!(err, ModelError::IndexOutOfRange { kind: "key node", index: 1, len: 1 }));

	let mut writer = ByteWriter::new();
	walk().dump(&mut writer, Dialect::Gam, 0, 2).expect("encodes");
	let err = Animation::load(&mut Cursor::new(writer.as_slice()), Dialect::Gam, 1).expect_err("node 1 missing");
	assert!(matches!(err, ModelError::IndexOutOfRange { kind: "key node", .. }));
}

#[test]
fn gam_header_fields_must_fit_shorts() {
	let mut animation = walk();
	animation.fps = 70_000;
	let err = animation.dump(&mut ByteWriter::new(), Dialect::Gam, 0, 2).expect_err("fps overflow");
	assert!(matches!(err, ModelError::ValueOutOfRange { field: "fps", .. }));
}

#[test]
fn section_holds_consecutive_records() {
	let animations = vec![walk(), Animation { name: "idle".to_owned(), frames: Vec::new(), ..walk() }];
	for dialect in [Dialect::Gam, Dialect::Sam] {
		let mut writer = ByteWriter::new();
		dump_animations(&mut writer, dialect, &animations, 2).expect("encodes");
		let decoded = load_animations(&mut Cursor::new(writer.as_slice()), dialect, 2, 2).expect("decodes");
		assert_eq!(decoded.len(), 2);
		assert_eq!(decoded[1].name, "idle");
		assert!(decoded[1].frames.is_empty());
	}
}

#[test]
fn truncated_frames_fail_before_allocating() {
	let mut writer = ByteWriter::new();
	writer.write_fixed_str("huge", Animation::NAME_WIDTH).expect("name");
	writer.write_u32(u32::MAX);
	writer.write_u32(30);
	writer.write_i32(-1);
	writer.write_u32(0);
	let err = Animation::load(&mut Cursor::new(writer.as_slice()), Dialect::Sam, 4).expect_err("truncated");
	assert!(matches!(err, ModelError::TruncatedInput { .. }));
}

#[test]
fn empty_frames_are_bounded() {
	let header = |frames: u32| {
		let mut writer = ByteWriter::new();
		writer.write_fixed_str("idle", Animation::NAME_WIDTH).expect("name");
		writer.write_u32(frames);
		writer.write_u32(30);
		writer.write_i32(-1);
		writer.write_u32(0);
		writer.into_inner()
	};

	let bytes = header(3);
	let animation = Animation::load(&mut Cursor::new(&bytes), Dialect::Sam, 0).expect("decodes");
	assert_eq!(animation.frames, vec![Vec::<Key>::new(); 3]);

	let bytes = header(u32::MAX);
	let err = Animation::load(&mut Cursor::new(&bytes), Dialect::Sam, 0).expect_err("unbounded");
	assert!(matches!(err, ModelError::ValueOutOfRange { field: "frame count", .. }));
}
