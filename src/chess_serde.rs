pub mod board_serde {
    use serde::{
        de::{Error, Visitor},
        Deserializer, Serializer,
    };

    use crate::board::Board;

    pub fn serialize<S: Serializer>(b: &Board, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&b.to_fen())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Board, D::Error> {
        struct BoardVisitor {}
        impl<'de> Visitor<'de> for BoardVisitor {
            type Value = Board;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a piece placement in the FEN format")
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Board::from_fen(v).map_err(|e| Error::custom(format!("error in parsing board: {e}")))
            }
        }
        d.deserialize_str(BoardVisitor {})
    }
}

pub mod coord_serde {
    use serde::{
        de::{Error, Visitor},
        Deserializer, Serializer,
    };

    use crate::types::Coord;

    pub fn serialize<S: Serializer>(c: &Coord, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&c.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Coord, D::Error> {
        struct CoordVisitor {}
        impl<'de> Visitor<'de> for CoordVisitor {
            type Value = Coord;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a square such as e4")
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match v.as_bytes() {
                    [file, rank] => Coord::from_algebraic(*file, *rank),
                    _ => None,
                }
                .ok_or_else(|| Error::custom(format!("error in parsing square {v:?}")))
            }
        }
        d.deserialize_str(CoordVisitor {})
    }
}
