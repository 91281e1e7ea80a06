pub mod card_record;
pub mod pokemontcg;
