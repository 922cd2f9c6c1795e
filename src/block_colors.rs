//! Static color and block-classification tables used by the renderer.

use crate::colors::{hex_color, Color};
use fnv::{FnvHashMap, FnvHashSet};
use once_cell::sync::Lazy;

pub const AIR: &str = "minecraft:air";
pub const WATER: &str = "minecraft:water";
pub const LAVA: &str = "minecraft:lava";
pub const PLAINS: &str = "minecraft:plains";

/// Fallback for blocks with no texture color. Deliberately loud so missing
/// entries show up on the map instead of vanishing.
pub const FALLBACK_COLOR: Color = Color::new(255.0, 20.0, 147.0);

fn hex_map(entries: &[(&'static str, &'static str)]) -> FnvHashMap<&'static str, Color> {
    entries.iter().map(|&(name, hex)| (name, hex_color(hex))).collect()
}

/// Colors that win over every other source, texture cache included.
pub static OVERRIDE_COLORS: Lazy<FnvHashMap<&'static str, Color>> = Lazy::new(|| {
    hex_map(&[
        ("minecraft:snow", "#E5E5E5"),
        ("minecraft:snow_block", "#E5E5E5"),
    ])
});

/// Small plants drawn on top of the surface they sit on.
pub static DECORATION_COLORS: Lazy<FnvHashMap<&'static str, Color>> = Lazy::new(|| {
    hex_map(&[
        ("minecraft:poppy", "#ED2929"),
        ("minecraft:dandelion", "#FED94F"),
        ("minecraft:blue_orchid", "#6496FA"),
        ("minecraft:allium", "#B87DEB"),
        ("minecraft:azure_bluet", "#D9E1E8"),
        ("minecraft:red_tulip", "#BF3638"),
        ("minecraft:orange_tulip", "#D87F33"),
        ("minecraft:white_tulip", "#DBEAEF"),
        ("minecraft:pink_tulip", "#E48BBA"),
        ("minecraft:oxeye_daisy", "#D4D4D4"),
        ("minecraft:cornflower", "#485ABD"),
        ("minecraft:lily_of_the_valley", "#DEDEDE"),
        ("minecraft:wither_rose", "#232022"),
        ("minecraft:sunflower", "#FCD721"),
        ("minecraft:lilac", "#B682BE"),
        ("minecraft:rose_bush", "#932D2D"),
        ("minecraft:peony", "#D9A8B6"),
        ("minecraft:torchflower", "#E47625"),
        ("minecraft:sugar_cane", "#9CD687"),
    ])
});

pub static DECORATION_BLOCKS: Lazy<FnvHashSet<&'static str>> =
    Lazy::new(|| DECORATION_COLORS.keys().copied().collect());

pub static BIOME_GRASS_COLORS: Lazy<FnvHashMap<&'static str, Color>> = Lazy::new(|| {
    hex_map(&[
        ("default", "#88A96D"),
        ("minecraft:badlands", "#A18E68"),
        ("minecraft:eroded_badlands", "#A18E68"),
        ("minecraft:wooded_badlands", "#A18E68"),
        ("minecraft:cherry_grove", "#AECF5E"),
        ("minecraft:desert", "#D1B27D"),
        ("minecraft:savanna", "#B5A062"),
        ("minecraft:savanna_plateau", "#B5A062"),
        ("minecraft:windswept_savanna", "#B5A062"),
        ("minecraft:stony_peaks", "#89947A"),
        ("minecraft:jungle", "#659A45"),
        ("minecraft:bamboo_jungle", "#659A45"),
        ("minecraft:sparse_jungle", "#72A858"),
        ("minecraft:mushroom_fields", "#52BE3C"),
        ("minecraft:swamp", "#686E37"),
        ("minecraft:mangrove_swamp", "#5C7258"),
        ("minecraft:plains", "#92A95C"),
        ("minecraft:sunflower_plains", "#92A95C"),
        ("minecraft:beach", "#92A95C"),
        ("minecraft:dripstone_caves", "#92A95C"),
        ("minecraft:forest", "#729656"),
        ("minecraft:flower_forest", "#729656"),
        ("minecraft:dark_forest", "#4E7530"),
        ("minecraft:birch_forest", "#84B563"),
        ("minecraft:old_growth_birch_forest", "#84B563"),
        ("minecraft:ocean", "#88A96D"),
        ("minecraft:deep_ocean", "#88A96D"),
        ("minecraft:warm_ocean", "#88A96D"),
        ("minecraft:lukewarm_ocean", "#88A96D"),
        ("minecraft:deep_lukewarm_ocean", "#88A96D"),
        ("minecraft:cold_ocean", "#88A96D"),
        ("minecraft:deep_cold_ocean", "#88A96D"),
        ("minecraft:deep_frozen_ocean", "#88A96D"),
        ("minecraft:river", "#88A96D"),
        ("minecraft:lush_caves", "#88A96D"),
        ("minecraft:meadow", "#78A164"),
        ("minecraft:old_growth_pine_taiga", "#74926B"),
        ("minecraft:taiga", "#74926B"),
        ("minecraft:old_growth_spruce_taiga", "#74926B"),
        ("minecraft:windswept_hills", "#7E8E78"),
        ("minecraft:windswept_gravelly_hills", "#7E8E78"),
        ("minecraft:windswept_forest", "#7E8E78"),
        ("minecraft:stony_shore", "#7E8E78"),
        ("minecraft:snowy_beach", "#7FAC8E"),
        ("minecraft:snowy_plains", "#7CB093"),
        ("minecraft:ice_spikes", "#7CB093"),
        ("minecraft:snowy_taiga", "#7CB093"),
        ("minecraft:frozen_ocean", "#7CB093"),
        ("minecraft:frozen_river", "#7CB093"),
        ("minecraft:grove", "#7CB093"),
        ("minecraft:snowy_slopes", "#7CB093"),
        ("minecraft:frozen_peaks", "#7CB093"),
        ("minecraft:jagged_peaks", "#7CB093"),
    ])
});

pub static BIOME_FOLIAGE_COLORS: Lazy<FnvHashMap<&'static str, Color>> = Lazy::new(|| {
    hex_map(&[
        ("default", "#6DA14A"),
        ("minecraft:badlands", "#958059"),
        ("minecraft:eroded_badlands", "#958059"),
        ("minecraft:wooded_badlands", "#958059"),
        ("minecraft:desert", "#B4A268"),
        ("minecraft:savanna", "#A08F57"),
        ("minecraft:savanna_plateau", "#A08F57"),
        ("minecraft:windswept_savanna", "#A08F57"),
        ("minecraft:stony_peaks", "#7A8265"),
        ("minecraft:jungle", "#508B28"),
        ("minecraft:bamboo_jungle", "#508B28"),
        ("minecraft:sparse_jungle", "#5F943D"),
        ("minecraft:mushroom_fields", "#29B50E"),
        ("minecraft:swamp", "#686E37"),
        ("minecraft:plains", "#7D9647"),
        ("minecraft:sunflower_plains", "#7D9647"),
        ("minecraft:beach", "#7D9647"),
        ("minecraft:dripstone_caves", "#7D9647"),
        ("minecraft:forest", "#668547"),
        ("minecraft:flower_forest", "#668547"),
        ("minecraft:dark_forest", "#487527"),
        ("minecraft:birch_forest", "#709650"),
        ("minecraft:old_growth_birch_forest", "#709650"),
        ("minecraft:ocean", "#6DA14A"),
        ("minecraft:deep_ocean", "#6DA14A"),
        ("minecraft:warm_ocean", "#6DA14A"),
        ("minecraft:lukewarm_ocean", "#6DA14A"),
        ("minecraft:deep_lukewarm_ocean", "#6DA14A"),
        ("minecraft:cold_ocean", "#6DA14A"),
        ("minecraft:deep_cold_ocean", "#6DA14A"),
        ("minecraft:deep_frozen_ocean", "#6DA14A"),
        ("minecraft:river", "#6DA14A"),
        ("minecraft:lush_caves", "#6DA14A"),
        ("minecraft:meadow", "#5FA345"),
        ("minecraft:old_growth_pine_taiga", "#649F5B"),
        ("minecraft:taiga", "#649E5F"),
        ("minecraft:old_growth_spruce_taiga", "#649E5F"),
        ("minecraft:windswept_hills", "#699D67"),
        ("minecraft:windswept_gravelly_hills", "#699D67"),
        ("minecraft:windswept_forest", "#699D67"),
        ("minecraft:stony_shore", "#699D67"),
        ("minecraft:snowy_beach", "#609C74"),
        ("minecraft:snowy_plains", "#5C9B77"),
        ("minecraft:ice_spikes", "#5C9B77"),
        ("minecraft:snowy_taiga", "#5C9B77"),
        ("minecraft:frozen_ocean", "#5C9B77"),
        ("minecraft:frozen_river", "#5C9B77"),
        ("minecraft:grove", "#5C9B77"),
        ("minecraft:snowy_slopes", "#5C9B77"),
        ("minecraft:frozen_peaks", "#5C9B77"),
        ("minecraft:jagged_peaks", "#5C9B77"),
    ])
});

pub static BIOME_WATER_COLORS: Lazy<FnvHashMap<&'static str, Color>> = Lazy::new(|| {
    hex_map(&[
        ("default", "#4371A6"),
        ("minecraft:badlands", "#4371A6"),
        ("minecraft:bamboo_jungle", "#4371A6"),
        ("minecraft:basalt_deltas", "#4371A6"),
        ("minecraft:beach", "#4371A6"),
        ("minecraft:birch_forest", "#4371A6"),
        ("minecraft:crimson_forest", "#4371A6"),
        ("minecraft:dark_forest", "#4371A6"),
        ("minecraft:deep_dark", "#4371A6"),
        ("minecraft:deep_ocean", "#4371A6"),
        ("minecraft:desert", "#4371A6"),
        ("minecraft:dripstone_caves", "#4371A6"),
        ("minecraft:end_barrens", "#4371A6"),
        ("minecraft:end_midlands", "#4371A6"),
        ("minecraft:eroded_badlands", "#4371A6"),
        ("minecraft:flower_forest", "#4371A6"),
        ("minecraft:forest", "#4371A6"),
        ("minecraft:frozen_peaks", "#4371A6"),
        ("minecraft:grove", "#4371A6"),
        ("minecraft:ice_spikes", "#4371A6"),
        ("minecraft:jagged_peaks", "#4371A6"),
        ("minecraft:jungle", "#4371A6"),
        ("minecraft:lush_caves", "#4371A6"),
        ("minecraft:mushroom_fields", "#4371A6"),
        ("minecraft:nether_wastes", "#4371A6"),
        ("minecraft:ocean", "#4371A6"),
        ("minecraft:old_growth_birch_forest", "#4371A6"),
        ("minecraft:old_growth_pine_taiga", "#4371A6"),
        ("minecraft:old_growth_spruce_taiga", "#4371A6"),
        ("minecraft:plains", "#4371A6"),
        ("minecraft:river", "#4371A6"),
        ("minecraft:savanna_plateau", "#4371A6"),
        ("minecraft:savanna", "#4371A6"),
        ("minecraft:small_end_islands", "#4371A6"),
        ("minecraft:snowy_plains", "#4371A6"),
        ("minecraft:snowy_slopes", "#4371A6"),
        ("minecraft:soul_sand_valley", "#4371A6"),
        ("minecraft:sparse_jungle", "#4371A6"),
        ("minecraft:stony_peaks", "#4371A6"),
        ("minecraft:stony_shore", "#4371A6"),
        ("minecraft:sunflower_plains", "#4371A6"),
        ("minecraft:taiga", "#4371A6"),
        ("minecraft:the_end", "#4371A6"),
        ("minecraft:the_void", "#4371A6"),
        ("minecraft:warped_forest", "#4371A6"),
        ("minecraft:windswept_forest", "#4371A6"),
        ("minecraft:windswept_gravelly_hills", "#4371A6"),
        ("minecraft:windswept_hills", "#4371A6"),
        ("minecraft:windswept_savanna", "#4371A6"),
        ("minecraft:wooded_badlands", "#4371A6"),
        ("minecraft:cold_ocean", "#3D6191"),
        ("minecraft:deep_cold_ocean", "#3D6191"),
        ("minecraft:snowy_taiga", "#3D6191"),
        ("minecraft:snowy_beach", "#3D6191"),
        ("minecraft:frozen_ocean", "#3A537A"),
        ("minecraft:deep_frozen_ocean", "#3A537A"),
        ("minecraft:frozen_river", "#3A537A"),
        ("minecraft:lukewarm_ocean", "#4A80B3"),
        ("minecraft:deep_lukewarm_ocean", "#4A80B3"),
        ("minecraft:swamp", "#55664A"),
        ("minecraft:warm_ocean", "#49A5D6"),
        ("minecraft:meadow", "#3C4E9C"),
        ("minecraft:mangrove_swamp", "#4E6659"),
        // Kept vibrant as a special biome.
        ("minecraft:cherry_grove", "#5DB7EF"),
    ])
});

/// Blocks whose top face has its own texture name. Anything not listed here
/// falls back to the block id with the namespace stripped.
pub static TEXTURE_ALIASES: Lazy<FnvHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("minecraft:lava", "lava_still"),
        ("minecraft:oak_log", "oak_log_top"),
        ("minecraft:spruce_log", "spruce_log_top"),
        ("minecraft:birch_log", "birch_log_top"),
        ("minecraft:jungle_log", "jungle_log_top"),
        ("minecraft:acacia_log", "acacia_log_top"),
        ("minecraft:dark_oak_log", "dark_oak_log_top"),
        ("minecraft:mangrove_log", "mangrove_log_top"),
        ("minecraft:cherry_log", "cherry_log_top"),
        ("minecraft:crimson_stem", "crimson_stem_top"),
        ("minecraft:warped_stem", "warped_stem_top"),
        ("minecraft:sandstone", "sandstone_top"),
        ("minecraft:red_sandstone", "red_sandstone_top"),
        ("minecraft:smooth_sandstone", "sandstone_top"),
        ("minecraft:smooth_red_sandstone", "red_sandstone_top"),
        ("minecraft:podzol", "podzol_top"),
        ("minecraft:mycelium", "mycelium_top"),
        ("minecraft:dirt_path", "dirt_path_top"),
        ("minecraft:crimson_nylium", "crimson_nylium"),
        ("minecraft:warped_nylium", "warped_nylium"),
        ("minecraft:melon", "melon_top"),
        ("minecraft:pumpkin", "pumpkin_top"),
        ("minecraft:carved_pumpkin", "pumpkin_top"),
        ("minecraft:jack_o_lantern", "pumpkin_top"),
        ("minecraft:hay_block", "hay_block_top"),
        ("minecraft:cactus", "cactus_top"),
        ("minecraft:basalt", "basalt_top"),
        ("minecraft:polished_basalt", "polished_basalt_top"),
        ("minecraft:smooth_basalt", "smooth_basalt"),
        ("minecraft:bone_block", "bone_block_top"),
        ("minecraft:magma_block", "magma"),
        ("minecraft:crafting_table", "crafting_table_top"),
        ("minecraft:furnace", "furnace_top"),
        ("minecraft:smoker", "smoker_top"),
        ("minecraft:blast_furnace", "blast_furnace_top"),
        ("minecraft:barrel", "barrel_top"),
        ("minecraft:composter", "composter_top"),
        ("minecraft:lectern", "lectern_top"),
        ("minecraft:tnt", "tnt_top"),
        ("minecraft:piston", "piston_top"),
        ("minecraft:sticky_piston", "piston_top_sticky"),
        ("minecraft:dispenser", "furnace_top"),
        ("minecraft:dropper", "furnace_top"),
        ("minecraft:observer", "observer_top"),
        ("minecraft:lodestone", "lodestone_top"),
        ("minecraft:respawn_anchor", "respawn_anchor_top"),
        ("minecraft:ancient_debris", "ancient_debris_top"),
        ("minecraft:dried_kelp_block", "dried_kelp_top"),
        ("minecraft:muddy_mangrove_roots", "muddy_mangrove_roots_top"),
        ("minecraft:bamboo_block", "bamboo_block_top"),
        ("minecraft:quartz_block", "quartz_block_top"),
        ("minecraft:quartz_pillar", "quartz_pillar_top"),
        ("minecraft:deepslate", "deepslate_top"),
        ("minecraft:ochre_froglight", "ochre_froglight_top"),
        ("minecraft:verdant_froglight", "verdant_froglight_top"),
        ("minecraft:pearlescent_froglight", "pearlescent_froglight_top"),
        ("minecraft:scaffolding", "scaffolding_top"),
        ("minecraft:jukebox", "jukebox_top"),
        ("minecraft:mushroom_stem", "mushroom_block_inside"),
        ("minecraft:snow_block", "snow"),
    ]
    .into_iter()
    .collect()
});

/// Blocks that terminate a downward column scan. Water is included so lakes
/// and oceans register as surfaces; lava is handled separately because it is
/// the only fluid outside this set that should still render.
pub static SOLID_BLOCKS: Lazy<FnvHashSet<&'static str>> = Lazy::new(|| {
    [
        // Terrain and stone
        "minecraft:stone",
        "minecraft:granite",
        "minecraft:polished_granite",
        "minecraft:diorite",
        "minecraft:polished_diorite",
        "minecraft:andesite",
        "minecraft:polished_andesite",
        "minecraft:deepslate",
        "minecraft:cobbled_deepslate",
        "minecraft:polished_deepslate",
        "minecraft:deepslate_bricks",
        "minecraft:deepslate_tiles",
        "minecraft:reinforced_deepslate",
        "minecraft:tuff",
        "minecraft:calcite",
        "minecraft:dripstone_block",
        "minecraft:bedrock",
        "minecraft:obsidian",
        "minecraft:crying_obsidian",
        "minecraft:cobblestone",
        "minecraft:mossy_cobblestone",
        "minecraft:smooth_stone",
        "minecraft:stone_bricks",
        "minecraft:mossy_stone_bricks",
        "minecraft:cracked_stone_bricks",
        "minecraft:chiseled_stone_bricks",
        "minecraft:bricks",
        "minecraft:packed_mud",
        "minecraft:mud_bricks",
        // Soil
        "minecraft:grass_block",
        "minecraft:dirt",
        "minecraft:coarse_dirt",
        "minecraft:rooted_dirt",
        "minecraft:podzol",
        "minecraft:mycelium",
        "minecraft:mud",
        "minecraft:muddy_mangrove_roots",
        "minecraft:dirt_path",
        "minecraft:farmland",
        "minecraft:clay",
        "minecraft:moss_block",
        // Sand and gravel
        "minecraft:sand",
        "minecraft:red_sand",
        "minecraft:gravel",
        "minecraft:sandstone",
        "minecraft:chiseled_sandstone",
        "minecraft:cut_sandstone",
        "minecraft:smooth_sandstone",
        "minecraft:red_sandstone",
        "minecraft:chiseled_red_sandstone",
        "minecraft:cut_red_sandstone",
        "minecraft:smooth_red_sandstone",
        // Snow and ice
        "minecraft:snow",
        "minecraft:snow_block",
        "minecraft:powder_snow",
        "minecraft:ice",
        "minecraft:packed_ice",
        "minecraft:blue_ice",
        // Fluids
        "minecraft:water",
        // Nether
        "minecraft:netherrack",
        "minecraft:soul_sand",
        "minecraft:soul_soil",
        "minecraft:basalt",
        "minecraft:polished_basalt",
        "minecraft:smooth_basalt",
        "minecraft:blackstone",
        "minecraft:polished_blackstone",
        "minecraft:glowstone",
        "minecraft:shroomlight",
        "minecraft:magma_block",
        "minecraft:nether_bricks",
        "minecraft:red_nether_bricks",
        "minecraft:nether_wart_block",
        "minecraft:warped_wart_block",
        "minecraft:crimson_nylium",
        "minecraft:warped_nylium",
        "minecraft:ancient_debris",
        // End
        "minecraft:end_stone",
        "minecraft:end_stone_bricks",
        "minecraft:purpur_block",
        "minecraft:purpur_pillar",
        // Ores and mineral blocks
        "minecraft:coal_ore",
        "minecraft:iron_ore",
        "minecraft:copper_ore",
        "minecraft:gold_ore",
        "minecraft:redstone_ore",
        "minecraft:emerald_ore",
        "minecraft:lapis_ore",
        "minecraft:diamond_ore",
        "minecraft:deepslate_coal_ore",
        "minecraft:deepslate_iron_ore",
        "minecraft:deepslate_copper_ore",
        "minecraft:deepslate_gold_ore",
        "minecraft:deepslate_redstone_ore",
        "minecraft:deepslate_emerald_ore",
        "minecraft:deepslate_lapis_ore",
        "minecraft:deepslate_diamond_ore",
        "minecraft:nether_gold_ore",
        "minecraft:nether_quartz_ore",
        "minecraft:coal_block",
        "minecraft:iron_block",
        "minecraft:copper_block",
        "minecraft:exposed_copper",
        "minecraft:weathered_copper",
        "minecraft:oxidized_copper",
        "minecraft:cut_copper",
        "minecraft:gold_block",
        "minecraft:redstone_block",
        "minecraft:emerald_block",
        "minecraft:lapis_block",
        "minecraft:diamond_block",
        "minecraft:netherite_block",
        "minecraft:raw_iron_block",
        "minecraft:raw_copper_block",
        "minecraft:raw_gold_block",
        "minecraft:amethyst_block",
        "minecraft:budding_amethyst",
        "minecraft:quartz_block",
        "minecraft:quartz_bricks",
        "minecraft:quartz_pillar",
        "minecraft:smooth_quartz",
        // Wood
        "minecraft:oak_log",
        "minecraft:spruce_log",
        "minecraft:birch_log",
        "minecraft:jungle_log",
        "minecraft:acacia_log",
        "minecraft:dark_oak_log",
        "minecraft:mangrove_log",
        "minecraft:cherry_log",
        "minecraft:crimson_stem",
        "minecraft:warped_stem",
        "minecraft:bamboo_block",
        "minecraft:oak_planks",
        "minecraft:spruce_planks",
        "minecraft:birch_planks",
        "minecraft:jungle_planks",
        "minecraft:acacia_planks",
        "minecraft:dark_oak_planks",
        "minecraft:mangrove_planks",
        "minecraft:cherry_planks",
        "minecraft:bamboo_planks",
        "minecraft:crimson_planks",
        "minecraft:warped_planks",
        // Leaves
        "minecraft:oak_leaves",
        "minecraft:spruce_leaves",
        "minecraft:birch_leaves",
        "minecraft:jungle_leaves",
        "minecraft:acacia_leaves",
        "minecraft:dark_oak_leaves",
        "minecraft:mangrove_leaves",
        "minecraft:cherry_leaves",
        "minecraft:azalea_leaves",
        "minecraft:flowering_azalea_leaves",
        // Ocean
        "minecraft:prismarine",
        "minecraft:prismarine_bricks",
        "minecraft:dark_prismarine",
        "minecraft:sea_lantern",
        "minecraft:sponge",
        "minecraft:wet_sponge",
        "minecraft:tube_coral_block",
        "minecraft:brain_coral_block",
        "minecraft:bubble_coral_block",
        "minecraft:fire_coral_block",
        "minecraft:horn_coral_block",
        "minecraft:dead_tube_coral_block",
        "minecraft:dead_brain_coral_block",
        "minecraft:dead_bubble_coral_block",
        "minecraft:dead_fire_coral_block",
        "minecraft:dead_horn_coral_block",
        "minecraft:dried_kelp_block",
        // Sculk
        "minecraft:sculk",
        "minecraft:sculk_catalyst",
        // Terracotta
        "minecraft:terracotta",
        "minecraft:white_terracotta",
        "minecraft:orange_terracotta",
        "minecraft:magenta_terracotta",
        "minecraft:light_blue_terracotta",
        "minecraft:yellow_terracotta",
        "minecraft:lime_terracotta",
        "minecraft:pink_terracotta",
        "minecraft:gray_terracotta",
        "minecraft:light_gray_terracotta",
        "minecraft:cyan_terracotta",
        "minecraft:purple_terracotta",
        "minecraft:blue_terracotta",
        "minecraft:brown_terracotta",
        "minecraft:green_terracotta",
        "minecraft:red_terracotta",
        "minecraft:black_terracotta",
        // Concrete
        "minecraft:white_concrete",
        "minecraft:orange_concrete",
        "minecraft:magenta_concrete",
        "minecraft:light_blue_concrete",
        "minecraft:yellow_concrete",
        "minecraft:lime_concrete",
        "minecraft:pink_concrete",
        "minecraft:gray_concrete",
        "minecraft:light_gray_concrete",
        "minecraft:cyan_concrete",
        "minecraft:purple_concrete",
        "minecraft:blue_concrete",
        "minecraft:brown_concrete",
        "minecraft:green_concrete",
        "minecraft:red_concrete",
        "minecraft:black_concrete",
        "minecraft:white_concrete_powder",
        "minecraft:orange_concrete_powder",
        "minecraft:magenta_concrete_powder",
        "minecraft:light_blue_concrete_powder",
        "minecraft:yellow_concrete_powder",
        "minecraft:lime_concrete_powder",
        "minecraft:pink_concrete_powder",
        "minecraft:gray_concrete_powder",
        "minecraft:light_gray_concrete_powder",
        "minecraft:cyan_concrete_powder",
        "minecraft:purple_concrete_powder",
        "minecraft:blue_concrete_powder",
        "minecraft:brown_concrete_powder",
        "minecraft:green_concrete_powder",
        "minecraft:red_concrete_powder",
        "minecraft:black_concrete_powder",
        // Wool
        "minecraft:white_wool",
        "minecraft:orange_wool",
        "minecraft:magenta_wool",
        "minecraft:light_blue_wool",
        "minecraft:yellow_wool",
        "minecraft:lime_wool",
        "minecraft:pink_wool",
        "minecraft:gray_wool",
        "minecraft:light_gray_wool",
        "minecraft:cyan_wool",
        "minecraft:purple_wool",
        "minecraft:blue_wool",
        "minecraft:brown_wool",
        "minecraft:green_wool",
        "minecraft:red_wool",
        "minecraft:black_wool",
        // Crops and plants that fill a full block
        "minecraft:melon",
        "minecraft:pumpkin",
        "minecraft:carved_pumpkin",
        "minecraft:jack_o_lantern",
        "minecraft:cactus",
        "minecraft:hay_block",
        "minecraft:brown_mushroom_block",
        "minecraft:red_mushroom_block",
        "minecraft:mushroom_stem",
        // Froglights
        "minecraft:ochre_froglight",
        "minecraft:verdant_froglight",
        "minecraft:pearlescent_froglight",
        // Utility
        "minecraft:bone_block",
        "minecraft:slime_block",
        "minecraft:honey_block",
        "minecraft:honeycomb_block",
        "minecraft:bookshelf",
        "minecraft:crafting_table",
        "minecraft:furnace",
        "minecraft:smoker",
        "minecraft:blast_furnace",
        "minecraft:barrel",
        "minecraft:composter",
        "minecraft:lectern",
        "minecraft:jukebox",
        "minecraft:note_block",
        "minecraft:tnt",
        "minecraft:target",
        "minecraft:dispenser",
        "minecraft:dropper",
        "minecraft:observer",
        "minecraft:piston",
        "minecraft:sticky_piston",
        "minecraft:redstone_lamp",
        "minecraft:lodestone",
        "minecraft:respawn_anchor",
    ]
    .into_iter()
    .collect()
});

/// A column scan stops at solid blocks and lava.
pub fn is_surface_block(name: &str) -> bool {
    SOLID_BLOCKS.contains(name) || name == LAVA
}

/// Whether the color should come from the biome tables rather than textures.
/// Takes the name with the `minecraft:` prefix already stripped.
pub fn is_biome_dependent(clean_name: &str) -> bool {
    clean_name == "grass_block"
        || clean_name.contains("leaves")
        || clean_name.contains("grass")
        || clean_name.contains("fern")
        || clean_name == "vine"
        || clean_name == "water"
}

/// Foliage covers leaves and vines; everything else biome-dependent except
/// water uses the grass table.
pub fn is_foliage(clean_name: &str) -> bool {
    clean_name.contains("leaves") || clean_name == "vine"
}

/// Looks up a biome color, prefixing bare biome names with `minecraft:` and
/// falling back to the table's `default` entry.
pub fn biome_color(table: &FnvHashMap<&'static str, Color>, biome_name: &str) -> Color {
    let color = if biome_name.contains(':') {
        table.get(biome_name)
    } else {
        table.get(format!("minecraft:{biome_name}").as_str())
    };
    color
        .or_else(|| table.get("default"))
        .copied()
        .unwrap_or(FALLBACK_COLOR)
}
