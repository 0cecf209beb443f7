/// Pinyin transliteration of Chinese titles, so Latin-keyboard queries can
/// match them ("baidu" or "bd" for 百度)
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").expect("valid Han pattern"));

static CHAR_TO_SYLLABLE: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    SYLLABLES
        .iter()
        .flat_map(|(syllable, chars)| chars.chars().map(move |c| (c, *syllable)))
        .collect()
});

/// Romanized text where `origin[i]` is the index of the source character
/// that produced `chars[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct Transliteration {
    pub chars: Vec<char>,
    pub origin: Vec<usize>,
}

impl Transliteration {
    fn push(&mut self, c: char, source: usize) {
        self.chars.push(c);
        self.origin.push(source);
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Whether the text has any Han characters worth transliterating
pub fn contains_han(text: &str) -> bool {
    HAN.is_match(text)
}

/// Toneless pinyin syllable for a character, if it is in the table
pub fn syllable(c: char) -> Option<&'static str> {
    CHAR_TO_SYLLABLE.get(&c).copied()
}

/// Full-syllable rendering: 百度 -> "baidu". Characters without a syllable
/// are copied through.
pub fn transliterate(chars: &[char]) -> Transliteration {
    render(chars, |s| s.chars().collect())
}

/// Initials rendering: 百度 -> "bd"
pub fn initials(chars: &[char]) -> Transliteration {
    render(chars, |s| s.chars().take(1).collect())
}

fn render(chars: &[char], pick: impl Fn(&str) -> Vec<char>) -> Transliteration {
    let mut out = Transliteration {
        chars: Vec::with_capacity(chars.len() * 2),
        origin: Vec::with_capacity(chars.len() * 2),
    };

    for (index, &c) in chars.iter().enumerate() {
        match syllable(c) {
            Some(s) => pick(s).into_iter().for_each(|p| out.push(p, index)),
            None => out.push(c, index),
        }
    }

    out
}

#[rustfmt::skip]
const SYLLABLES: &[(&str, &str)] = &[
    ("a", "啊阿呵"),
    ("ai", "爱哀唉矮癌"),
    ("an", "安按暗岸案"),
    ("ang", "昂"),
    ("ao", "奥傲熬"),
    ("ba", "八把吧爸霸"),
    ("bai", "白百拜败"),
    ("ban", "半办班般版"),
    ("bang", "帮棒榜"),
    ("bao", "包报保抱宝"),
    ("bei", "北杯背被悲"),
    ("ben", "本奔笨"),
    ("bi", "比笔必闭避哔"),
    ("bian", "边变便遍编"),
    ("biao", "表标彪"),
    ("bie", "别憋"),
    ("bin", "宾滨"),
    ("bing", "冰病并兵"),
    ("bo", "波播博薄"),
    ("bu", "不步部布"),
    ("ca", "擦"),
    ("cai", "才菜采财猜"),
    ("can", "参惨餐残"),
    ("cang", "藏仓苍"),
    ("cao", "草操糙"),
    ("ce", "测策侧厕"),
    ("ceng", "层曾"),
    ("cha", "查茶差插"),
    ("chai", "拆柴"),
    ("chan", "产缠颤"),
    ("chang", "长常场唱厂"),
    ("chao", "超潮朝吵炒"),
    ("che", "车彻扯"),
    ("chen", "陈沉晨尘称"),
    ("cheng", "成城程乘"),
    ("chi", "吃池迟持尺"),
    ("chong", "充冲虫重"),
    ("chou", "抽愁丑臭"),
    ("chu", "出处初除楚"),
    ("chuang", "创窗床闯"),
    ("chui", "吹垂锤"),
    ("chun", "春纯蠢"),
    ("ci", "词此次刺磁"),
    ("cong", "从聪葱"),
    ("cu", "粗醋促"),
    ("cuan", "窜"),
    ("cui", "催脆"),
    ("cun", "村存寸"),
    ("cuo", "错措"),
    ("da", "大打达答"),
    ("dai", "带代待袋戴"),
    ("dan", "但单担蛋胆"),
    ("dang", "当党挡档"),
    ("dao", "到道刀倒导"),
    ("de", "的得德"),
    ("deng", "等灯登"),
    ("di", "地第低底弟"),
    ("dian", "点电店典"),
    ("diao", "掉调钓雕"),
    ("die", "跌爹蝶"),
    ("ding", "定顶订钉"),
    ("dong", "东动冬懂洞"),
    ("dou", "都斗豆逗"),
    ("du", "读度毒独堵"),
    ("duan", "段短断"),
    ("dui", "对队堆"),
    ("dun", "顿蹲盾"),
    ("duo", "多夺朵躲"),
    ("e", "饿恶额俄"),
    ("ei", "诶"),
    ("en", "恩嗯"),
    ("er", "二而儿耳"),
    ("fa", "发法罚乏"),
    ("fan", "反饭烦犯番翻"),
    ("fang", "方房放防访"),
    ("fei", "飞非费肥废"),
    ("fen", "分粉份愤纷"),
    ("feng", "风封峰丰锋"),
    ("fo", "佛"),
    ("fou", "否"),
    ("fu", "服父夫付复"),
    ("gai", "该改概盖"),
    ("gan", "干感敢赶甘"),
    ("gang", "刚钢港纲"),
    ("gao", "高搞告稿"),
    ("ge", "个各歌哥格"),
    ("gei", "给"),
    ("gen", "根跟"),
    ("geng", "更耕"),
    ("gong", "工公共功供"),
    ("gou", "够狗购沟勾"),
    ("gu", "古故骨谷股"),
    ("gua", "瓜挂刮"),
    ("guai", "怪乖拐"),
    ("guan", "关管观官惯"),
    ("guang", "光广逛"),
    ("gui", "贵鬼归规"),
    ("gun", "滚棍"),
    ("guo", "国过果锅郭"),
    ("ha", "哈"),
    ("hai", "还海害孩"),
    ("han", "汉喊含寒韩"),
    ("hang", "行航"),
    ("hao", "好号毫豪耗"),
    ("he", "和何河喝合"),
    ("hei", "黑嘿"),
    ("hen", "很恨狠"),
    ("heng", "横哼"),
    ("hong", "红宏洪轰"),
    ("hou", "后候厚猴吼"),
    ("hu", "湖虎户护呼乎"),
    ("hua", "话花画化华"),
    ("huai", "坏怀"),
    ("huan", "换欢环缓"),
    ("huang", "黄皇慌荒"),
    ("hui", "会回灰汇挥"),
    ("hun", "混婚昏魂"),
    ("huo", "活火或获货"),
    ("ji", "几机基及己计夹"),
    ("jia", "家加价假嫁"),
    ("jian", "间见建件简"),
    ("jiang", "将讲江降奖"),
    ("jiao", "叫教交脚角"),
    ("jie", "接结街节解"),
    ("jin", "进近金今尽"),
    ("jing", "经精静京惊"),
    ("jiu", "就九久酒旧"),
    ("ju", "举句具据居"),
    ("juan", "卷倦绢"),
    ("jue", "觉决绝"),
    ("jun", "军均君菌"),
    ("ka", "卡咖"),
    ("kai", "开凯"),
    ("kan", "看砍刊"),
    ("kang", "扛抗康"),
    ("kao", "考靠烤"),
    ("ke", "可课科客刻"),
    ("ken", "肯啃"),
    ("keng", "坑"),
    ("kong", "空控孔恐"),
    ("kou", "口扣"),
    ("ku", "苦哭库酷"),
    ("kua", "夸跨"),
    ("kuai", "快块筷"),
    ("kuan", "宽款"),
    ("kuang", "狂况矿框"),
    ("kun", "困昆"),
    ("kuo", "扩阔"),
    ("la", "拉啦辣"),
    ("lai", "来赖"),
    ("lan", "蓝烂懒兰栏"),
    ("lang", "浪狼郎"),
    ("lao", "老劳牢"),
    ("le", "了乐勒"),
    ("lei", "类累泪雷"),
    ("leng", "冷愣"),
    ("li", "里理力离利哩"),
    ("lia", "俩"),
    ("lian", "连脸练联恋"),
    ("liang", "两量亮凉粮"),
    ("liao", "料聊疗"),
    ("lie", "列裂烈猎"),
    ("lin", "林临邻"),
    ("ling", "零领另灵铃"),
    ("liu", "六留流刘"),
    ("long", "龙隆弄"),
    ("lou", "楼漏"),
    ("lu", "路录绿露陆"),
    ("luan", "乱卵"),
    ("lun", "论轮伦"),
    ("luo", "落罗络"),
    ("lv", "旅律滤"),
    ("ma", "吗妈马骂码"),
    ("mai", "买卖迈埋"),
    ("man", "满慢漫蛮"),
    ("mang", "忙盲茫"),
    ("mao", "毛猫帽冒贸"),
    ("me", "么"),
    ("mei", "没每美妹梅"),
    ("men", "门们闷"),
    ("meng", "梦蒙猛"),
    ("mi", "米密迷蜜"),
    ("mian", "面免棉眠"),
    ("miao", "秒妙苗描"),
    ("mie", "灭"),
    ("min", "民敏闽"),
    ("ming", "名明命鸣"),
    ("mo", "磨摸莫末"),
    ("mou", "某谋"),
    ("mu", "母木目墓幕"),
    ("na", "那拿哪纳"),
    ("nai", "奶乃耐"),
    ("nan", "南男难"),
    ("nao", "脑闹"),
    ("ne", "呢"),
    ("nei", "内"),
    ("nen", "嫩"),
    ("neng", "能"),
    ("ni", "你泥逆拟"),
    ("nian", "年念粘"),
    ("niang", "娘"),
    ("niao", "鸟尿"),
    ("nin", "您"),
    ("ning", "宁凝"),
    ("niu", "牛扭纽"),
    ("nong", "农浓"),
    ("nu", "女怒努"),
    ("nuan", "暖"),
    ("nuo", "诺"),
    ("o", "哦噢"),
    ("ou", "偶欧"),
    ("pa", "怕拍爬帕"),
    ("pai", "排派"),
    ("pan", "盘判盼"),
    ("pang", "旁胖"),
    ("pao", "跑泡炮抛"),
    ("pei", "配陪培赔"),
    ("pen", "喷盆"),
    ("peng", "朋碰棚捧"),
    ("pi", "皮批匹劈屁"),
    ("pian", "片骗篇"),
    ("piao", "票飘漂"),
    ("pin", "品拼贫频"),
    ("ping", "平评瓶苹"),
    ("po", "破坡泼"),
    ("pu", "普铺扑"),
    ("qi", "起其气七期"),
    ("qia", "恰"),
    ("qian", "前钱千签浅"),
    ("qiang", "强墙抢枪"),
    ("qiao", "桥敲巧瞧"),
    ("qie", "切且窃"),
    ("qin", "亲琴勤侵秦"),
    ("qing", "请清情青轻"),
    ("qiu", "球秋求"),
    ("qu", "去取曲区"),
    ("quan", "全权泉圈劝"),
    ("que", "却确缺"),
    ("qun", "群裙"),
    ("ran", "然染燃"),
    ("rang", "让嚷"),
    ("rao", "绕扰"),
    ("re", "热惹"),
    ("ren", "人认任忍仁"),
    ("reng", "仍扔"),
    ("ri", "日"),
    ("rong", "容融荣"),
    ("rou", "肉柔"),
    ("ru", "如入乳"),
    ("ruan", "软"),
    ("rui", "瑞锐"),
    ("run", "润"),
    ("ruo", "若弱"),
    ("sa", "撒洒"),
    ("sai", "赛塞"),
    ("san", "三散伞"),
    ("sang", "桑丧"),
    ("sao", "扫骚"),
    ("se", "色涩"),
    ("sen", "森"),
    ("sha", "杀沙傻纱"),
    ("shai", "晒"),
    ("shan", "山闪善扇"),
    ("shang", "上伤商尚赏"),
    ("shao", "少烧绍稍"),
    ("she", "社设舍射蛇"),
    ("shei", "谁"),
    ("shen", "什深身神甚"),
    ("sheng", "生声省胜升"),
    ("shi", "是时事十使视"),
    ("shou", "手收受首守"),
    ("shu", "书树数输属"),
    ("shua", "刷耍"),
    ("shuai", "帅摔衰"),
    ("shuan", "栓"),
    ("shuang", "双霜爽"),
    ("shui", "水睡"),
    ("shun", "顺瞬"),
    ("shuo", "说硕"),
    ("si", "四死思私司"),
    ("song", "送松宋"),
    ("sou", "搜"),
    ("su", "苏素速宿诉"),
    ("suan", "算酸"),
    ("sui", "虽随岁碎"),
    ("sun", "孙损笋"),
    ("suo", "所锁索"),
    ("ta", "他她它踏塔"),
    ("tai", "太台态抬"),
    ("tan", "谈坛弹探摊"),
    ("tang", "堂糖汤躺趟"),
    ("tao", "逃桃讨套陶淘"),
    ("te", "特"),
    ("teng", "疼腾"),
    ("ti", "题提体替踢"),
    ("tian", "天田填甜"),
    ("tiao", "条跳挑"),
    ("tie", "铁贴"),
    ("ting", "听停挺厅"),
    ("tong", "同通痛统桶"),
    ("tou", "头投透偷"),
    ("tu", "土图突兔吐"),
    ("tuan", "团"),
    ("tui", "退推腿"),
    ("tun", "吞"),
    ("tuo", "脱拖托"),
    ("wa", "娃挖哇瓦"),
    ("wai", "外歪"),
    ("wan", "完晚玩万碗"),
    ("wang", "王往网望忘"),
    ("wei", "为位未围味微"),
    ("wen", "问文闻温稳"),
    ("weng", "翁"),
    ("wo", "我握窝"),
    ("wu", "无五物屋误"),
    ("xi", "西习喜系洗戏"),
    ("xia", "下夏吓虾瞎"),
    ("xian", "先现线县险"),
    ("xiang", "想向像香响箱"),
    ("xiao", "小笑校效消"),
    ("xie", "些写谢血鞋"),
    ("xin", "心新信欣"),
    ("xing", "星性姓兴"),
    ("xiong", "兄熊胸"),
    ("xiu", "修秀休袖"),
    ("xu", "需许续须虚"),
    ("xuan", "选宣悬旋"),
    ("xue", "学雪穴"),
    ("xun", "讯寻训迅"),
    ("ya", "呀牙压押鸭"),
    ("yan", "眼言严研烟"),
    ("yang", "样阳养洋杨"),
    ("yao", "要药摇腰咬"),
    ("ye", "也业夜叶野页"),
    ("yi", "一以已意衣译"),
    ("yin", "因音引印银"),
    ("ying", "应影英营赢"),
    ("yo", "哟"),
    ("yong", "用永勇涌"),
    ("you", "有又友由油邮游"),
    ("yu", "与于语鱼雨"),
    ("yuan", "元原远院员源"),
    ("yue", "月越约"),
    ("yun", "云运允晕"),
    ("za", "杂砸"),
    ("zai", "在再载灾"),
    ("zan", "咱赞暂"),
    ("zang", "脏"),
    ("zao", "早造糟遭枣"),
    ("ze", "则责择"),
    ("zei", "贼"),
    ("zen", "怎"),
    ("zeng", "增"),
    ("zha", "扎炸眨渣"),
    ("zhai", "宅窄摘"),
    ("zhan", "站战占展"),
    ("zhang", "张章账掌"),
    ("zhao", "找照招着赵"),
    ("zhe", "这者折"),
    ("zhen", "真镇震针珍"),
    ("zheng", "正整政证争"),
    ("zhi", "只知之直至"),
    ("zhong", "中种众终"),
    ("zhou", "周洲州粥舟"),
    ("zhu", "主住注助祝"),
    ("zhua", "抓"),
    ("zhuai", "拽"),
    ("zhuan", "转专赚砖"),
    ("zhuang", "装状撞庄"),
    ("zhui", "追坠"),
    ("zhun", "准"),
    ("zhuo", "桌捉"),
    ("zi", "自子字资紫"),
    ("zong", "总宗综"),
    ("zou", "走奏"),
    ("zu", "组族足祖阻"),
    ("zuan", "钻"),
    ("zui", "最嘴罪醉"),
    ("zun", "尊遵"),
    ("zuo", "做作坐左座"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_contains_han() {
        assert!(contains_han("百度"));
        assert!(contains_han("GitHub 中文"));
        assert!(!contains_han("GitHub"));
        assert!(!contains_han("café"));
    }

    #[test]
    fn test_syllable_lookup() {
        assert_eq!(syllable('百'), Some("bai"));
        assert_eq!(syllable('度'), Some("du"));
        assert_eq!(syllable('a'), None);
    }

    #[test]
    fn test_transliterate_tracks_origin() {
        let result = transliterate(&chars("百度"));

        assert_eq!(result.as_string(), "baidu");
        assert_eq!(result.origin, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_transliterate_mixed_text() {
        let result = transliterate(&chars("a新闻"));

        assert_eq!(result.as_string(), "axinwen");
        assert_eq!(result.origin[0], 0);
        assert_eq!(*result.origin.last().unwrap(), 2);
    }

    #[test]
    fn test_initials() {
        let result = initials(&chars("百度地图"));

        assert_eq!(result.as_string(), "bddt");
        assert_eq!(result.origin, vec![0, 1, 2, 3]);
    }
}
