use super::Serializer;

use stoa_core::driver::BackendKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Mysql,
    Derby,
}

impl Serializer {
    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }

    pub fn derby() -> Serializer {
        Serializer {
            flavor: Flavor::Derby,
        }
    }

    pub fn for_kind(kind: BackendKind) -> Serializer {
        match kind {
            BackendKind::Postgresql => Serializer::postgresql(),
            BackendKind::Mysql => Serializer::mysql(),
            BackendKind::Derby => Serializer::derby(),
        }
    }

    pub(super) fn is_mysql(&self) -> bool {
        self.flavor == Flavor::Mysql
    }
}
