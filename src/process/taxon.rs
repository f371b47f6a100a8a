use crate::error::FieldError;

/// Vertebrate class encoded by the first character of a unique code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Taxon {
    Amphibians,
    Birds,
    Mammals,
    Reptiles,
}

impl Taxon {
    pub fn from_code(code: &str) -> Result<Self, FieldError> {
        match code.chars().next() {
            Some('a') => Ok(Taxon::Amphibians),
            Some('b') => Ok(Taxon::Birds),
            Some('m') => Ok(Taxon::Mammals),
            Some('r') => Ok(Taxon::Reptiles),
            _ => Err(FieldError::UnmappedTaxon {
                code: code.to_string(),
            }),
        }
    }

    // "Amphbians" is the spelling already published in the 2001v1 records.
    pub fn title(&self) -> &'static str {
        match self {
            Taxon::Amphibians => "Amphbians",
            Taxon::Birds => "Birds",
            Taxon::Mammals => "Mammals",
            Taxon::Reptiles => "Reptiles",
        }
    }

    pub fn lower(&self) -> &'static str {
        match self {
            Taxon::Amphibians => "amphbians",
            Taxon::Birds => "birds",
            Taxon::Mammals => "mammals",
            Taxon::Reptiles => "reptiles",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_map_to_pairs() {
        let cases = [
            ("aSNAK", "Amphbians", "amphbians"),
            ("bROBI", "Birds", "birds"),
            ("mBEAR", "Mammals", "mammals"),
            ("rTURT", "Reptiles", "reptiles"),
        ];
        for (code, title, lower) in cases {
            let t = Taxon::from_code(code).unwrap();
            assert_eq!((t.title(), t.lower()), (title, lower), "{}", code);
        }
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        assert_eq!(
            Taxon::from_code("ABEAR"),
            Err(FieldError::UnmappedTaxon {
                code: "ABEAR".into()
            })
        );
        assert!(Taxon::from_code("").is_err());
        assert!(Taxon::from_code("fTROU").is_err());
    }
}
