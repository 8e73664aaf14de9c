//! Built-in canonical genre taxonomy.
//!
//! The same table backs the onboarding genre picker, so a slug added here becomes selectable
//! by users on the next release.

pub const BUILTIN_VERSION: &str = "2024.1";

#[derive(Debug, Clone, Copy)]
pub(crate) struct GenreSeed {
    pub slug: &'static str,
    pub related: &'static [&'static str],
    pub labels: &'static [(&'static str, &'static [&'static str])],
}

pub(crate) const GENRE_SEEDS: &[GenreSeed] = &[
    GenreSeed {
        slug: "action",
        related: &["shooter", "fighting", "platformer", "adventure"],
        labels: &[
            ("en", &["Action"]),
            ("de", &["Action", "Actionspiel"]),
            ("fr", &["Action"]),
            ("es", &["Acción"]),
            ("pt", &["Ação"]),
            ("it", &["Azione"]),
            ("ja", &["アクション"]),
        ],
    },
    GenreSeed {
        slug: "adventure",
        related: &["action", "rpg", "puzzle"],
        labels: &[
            ("en", &["Adventure"]),
            ("de", &["Abenteuer"]),
            ("fr", &["Aventure"]),
            ("es", &["Aventura"]),
            ("pt", &["Aventura"]),
            ("it", &["Avventura"]),
            ("ja", &["アドベンチャー"]),
        ],
    },
    GenreSeed {
        slug: "rpg",
        related: &["adventure", "strategy"],
        labels: &[
            ("en", &["RPG", "Role-Playing", "Role Playing", "JRPG"]),
            ("de", &["Rollenspiel"]),
            ("fr", &["Jeu de rôle", "Jeux de rôle"]),
            ("es", &["Rol", "Juego de rol"]),
            ("pt", &["RPG", "Jogo de interpretação"]),
            ("it", &["Gioco di ruolo"]),
            ("ja", &["ロールプレイング", "ＲＰＧ"]),
        ],
    },
    GenreSeed {
        slug: "strategy",
        related: &["simulation", "rpg"],
        labels: &[
            ("en", &["Strategy", "RTS", "4X", "Tactics", "Turn-Based"]),
            ("de", &["Strategie"]),
            ("fr", &["Stratégie"]),
            ("es", &["Estrategia"]),
            ("pt", &["Estratégia"]),
            ("it", &["Strategia"]),
            ("ja", &["ストラテジー", "シミュレーション戦略"]),
        ],
    },
    GenreSeed {
        slug: "simulation",
        related: &["strategy", "sandbox", "sports", "racing"],
        labels: &[
            ("en", &["Simulation", "Simulator"]),
            ("de", &["Simulation", "Simulator"]),
            ("fr", &["Simulation"]),
            ("es", &["Simulación"]),
            ("pt", &["Simulação"]),
            ("it", &["Simulazione"]),
            ("ja", &["シミュレーション"]),
        ],
    },
    GenreSeed {
        slug: "sports",
        related: &["racing", "simulation"],
        labels: &[
            ("en", &["Sports", "Sport", "Esports"]),
            ("de", &["Sport", "Sportspiel"]),
            ("fr", &["Sport", "Sports"]),
            ("es", &["Deportes"]),
            ("pt", &["Esportes", "Desporto"]),
            ("it", &["Sport", "Sportivo"]),
            ("ja", &["スポーツ"]),
        ],
    },
    GenreSeed {
        slug: "racing",
        related: &["sports", "simulation"],
        labels: &[
            ("en", &["Racing", "Driving"]),
            ("de", &["Rennspiel", "Rennsport"]),
            ("fr", &["Course automobile", "Jeu de course"]),
            ("es", &["Carreras", "Conducción"]),
            ("pt", &["Corrida"]),
            ("it", &["Corse", "Guida"]),
            ("ja", &["レース", "レーシング"]),
        ],
    },
    GenreSeed {
        slug: "puzzle",
        related: &["casual", "adventure"],
        labels: &[
            ("en", &["Puzzle", "Logic"]),
            ("de", &["Puzzle", "Denkspiel", "Rätsel"]),
            ("fr", &["Réflexion", "Casse-tête"]),
            ("es", &["Rompecabezas", "Puzle"]),
            ("pt", &["Quebra-cabeça"]),
            ("it", &["Rompicapo"]),
            ("ja", &["パズル"]),
        ],
    },
    GenreSeed {
        slug: "shooter",
        related: &["action", "survival"],
        labels: &[
            ("en", &["Shooter", "FPS", "Shoot 'em up", "First-Person Shooter"]),
            ("de", &["Shooter", "Ego-Shooter"]),
            ("fr", &["Tir", "Jeu de tir"]),
            ("es", &["Disparos"]),
            ("pt", &["Tiro"]),
            ("it", &["Sparatutto"]),
            ("ja", &["シューティング"]),
        ],
    },
    GenreSeed {
        slug: "fighting",
        related: &["action"],
        labels: &[
            ("en", &["Fighting", "Beat 'em up", "Brawler"]),
            ("de", &["Kampfspiel", "Prügelspiel"]),
            ("fr", &["Combat"]),
            ("es", &["Lucha"]),
            ("pt", &["Luta"]),
            ("it", &["Picchiaduro"]),
            ("ja", &["格闘"]),
        ],
    },
    GenreSeed {
        slug: "platformer",
        related: &["action", "indie"],
        labels: &[
            ("en", &["Platformer", "Metroidvania"]),
            ("de", &["Jump 'n' Run", "Plattformer"]),
            ("fr", &["Plates-formes", "Plateforme"]),
            ("es", &["Plataformas"]),
            ("pt", &["Plataforma"]),
            ("it", &["Piattaforme"]),
            ("ja", &["プラットフォーマー", "横スクロール"]),
        ],
    },
    GenreSeed {
        slug: "horror",
        related: &["survival", "adventure"],
        labels: &[
            ("en", &["Horror", "Survival Horror"]),
            ("de", &["Horror"]),
            ("fr", &["Horreur", "Épouvante"]),
            ("es", &["Terror"]),
            ("pt", &["Terror"]),
            ("it", &["Orrore"]),
            ("ja", &["ホラー"]),
        ],
    },
    GenreSeed {
        slug: "survival",
        related: &["horror", "sandbox", "shooter"],
        labels: &[
            ("en", &["Survival"]),
            ("de", &["Überleben", "Survival"]),
            ("fr", &["Survie"]),
            ("es", &["Supervivencia"]),
            ("pt", &["Sobrevivência"]),
            ("it", &["Sopravvivenza"]),
            ("ja", &["サバイバル"]),
        ],
    },
    GenreSeed {
        slug: "sandbox",
        related: &["simulation", "survival"],
        labels: &[
            ("en", &["Sandbox", "Open World", "Crafting"]),
            ("de", &["Sandbox", "Offene Welt"]),
            ("fr", &["Bac à sable", "Monde ouvert"]),
            ("es", &["Mundo abierto"]),
            ("pt", &["Mundo aberto"]),
            ("it", &["Mondo aperto"]),
            ("ja", &["サンドボックス", "オープンワールド"]),
        ],
    },
    GenreSeed {
        slug: "casual",
        related: &["puzzle", "indie"],
        labels: &[
            ("en", &["Casual", "Family"]),
            ("de", &["Gelegenheitsspiel", "Familie"]),
            ("fr", &["Occasionnel", "Famille"]),
            ("es", &["Familiar"]),
            ("pt", &["Família"]),
            ("it", &["Famiglia"]),
            ("ja", &["カジュアル", "ファミリー"]),
        ],
    },
    GenreSeed {
        slug: "indie",
        related: &["platformer", "casual"],
        labels: &[
            ("en", &["Indie", "Independent"]),
            ("de", &["Indie"]),
            ("fr", &["Indépendant"]),
            ("es", &["Independiente"]),
            ("pt", &["Independente"]),
            ("it", &["Indipendente"]),
            ("ja", &["インディー"]),
        ],
    },
];
