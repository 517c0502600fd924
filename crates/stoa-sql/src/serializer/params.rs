use super::{Flavor, Formatter, ToSql};

pub trait Params {
    fn push(&mut self, param: &str) -> Placeholder;
}

pub struct Placeholder(pub usize);

impl Params for Vec<String> {
    fn push(&mut self, value: &str) -> Placeholder {
        self.push(value.to_string());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        let _ = match f.serializer.flavor {
            Flavor::Postgresql => write!(f.dst, "${}", self.0),
            Flavor::Mysql | Flavor::Derby => write!(f.dst, "?"),
        };
    }
}

/// A string value bound as a parameter.
pub(super) struct Param<'a>(pub(super) &'a str);

impl ToSql for Param<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self.0);
        placeholder.to_sql(f);
    }
}
