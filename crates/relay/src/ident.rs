//! Generierung sichtbarer Session-IDs
//!
//! Kurzform `[A-Z]{2}[0-9]{2}` (z.B. `QX07`). Nach [`MAX_VERSUCHE`]
//! Kollisionen wird auf die Langform `[A-Z]{4}[0-9]{4}` ausgewichen, danach
//! gibt es keine ID.

use rand::Rng;
use tresen_core::SessionId;

/// Versuche pro Form
pub const MAX_VERSUCHE: usize = 64;

fn zufalls_id<R: Rng + ?Sized>(rng: &mut R, buchstaben: usize, ziffern: usize) -> String {
    let mut id = String::with_capacity(buchstaben + ziffern);
    for _ in 0..buchstaben {
        id.push(rng.gen_range(b'A'..=b'Z') as char);
    }
    for _ in 0..ziffern {
        id.push(rng.gen_range(b'0'..=b'9') as char);
    }
    id
}

/// Erzeugt eine ID fuer die `belegt` `false` liefert
///
/// `belegt` muss registrierte und gebannte IDs abdecken.
pub fn id_generieren<R, F>(rng: &mut R, belegt: F) -> Option<SessionId>
where
    R: Rng + ?Sized,
    F: Fn(&SessionId) -> bool,
{
    for (buchstaben, ziffern) in [(2, 2), (4, 4)] {
        for _ in 0..MAX_VERSUCHE {
            let id = SessionId::new(zufalls_id(rng, buchstaben, ziffern));
            if !belegt(&id) {
                return Some(id);
            }
        }
        tracing::warn!(buchstaben, ziffern, "Keine freie ID in dieser Form gefunden");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kurzform(id: &str) -> bool {
        let b = id.as_bytes();
        b.len() == 4
            && b[..2].iter().all(u8::is_ascii_uppercase)
            && b[2..].iter().all(u8::is_ascii_digit)
    }

    #[test]
    fn kurzform_wenn_frei() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = id_generieren(&mut rng, |_| false).unwrap();
        assert!(kurzform(id.as_str()), "{id}");
    }

    #[test]
    fn weicht_auf_langform_aus() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = id_generieren(&mut rng, |id| id.as_str().len() == 4).unwrap();
        let b = id.as_str().as_bytes();
        assert_eq!(b.len(), 8);
        assert!(b[..4].iter().all(u8::is_ascii_uppercase));
        assert!(b[4..].iter().all(u8::is_ascii_digit));
    }

    #[test]
    fn alles_belegt_ergibt_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(id_generieren(&mut rng, |_| true).is_none());
    }

    #[test]
    fn belegte_ids_werden_nie_geliefert() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut vergeben = std::collections::HashSet::new();
        for _ in 0..200 {
            let id = id_generieren(&mut rng, |id| vergeben.contains(id)).unwrap();
            assert!(vergeben.insert(id));
        }
    }
}
